//! Runtime around `combat-core`: sessions, persistence and pacing.
//!
//! - [`CombatSession`] owns the state and the content it runs against, and
//!   records accepted commands for replay.
//! - [`CombatRuntime`] runs a session on a tokio task behind a cloneable
//!   [`SessionHandle`], pacing the enemy turn with [`EnemyTurnDriver`].
//! - [`repository`] persists [`SessionSnapshot`]s.
pub mod driver;
pub mod error;
pub mod events;
pub mod handle;
pub mod repository;
pub mod runtime;
pub mod session;

mod worker;

pub use driver::EnemyTurnDriver;
pub use error::{Result, RuntimeError};
pub use events::SessionEvent;
pub use handle::SessionHandle;
pub use repository::{
    FileRepository, InMemoryRepository, RepositoryError, SessionRepository,
};
pub use runtime::{CombatRuntime, RuntimeConfig};
pub use session::{CombatSession, SessionSnapshot};
