use chrono::{DateTime, Utc};

mod goal;
pub mod lenient;
mod priority;
mod progress;
mod session;
mod task;

pub use goal::*;
pub use priority::*;
pub use progress::*;
pub use session::*;
pub use task::*;

/// A stored record addressed by its string id.
pub trait Record {
    fn id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_record!(Goal, Task, Session, ProgressEntry);

/// A record that tracks when it was created and last changed.
pub trait Timestamped: Record {
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn set_updated_at(&mut self, at: DateTime<Utc>);
}

macro_rules! impl_timestamped {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Timestamped for $ty {
                fn created_at(&self) -> DateTime<Utc> {
                    self.created_at
                }

                fn updated_at(&self) -> DateTime<Utc> {
                    self.updated_at
                }

                fn set_updated_at(&mut self, at: DateTime<Utc>) {
                    self.updated_at = at;
                }
            }
        )*
    };
}

impl_timestamped!(Goal, Task, Session);
