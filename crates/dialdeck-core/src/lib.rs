//! Client-side state synchronization for the dialdeck console.
//!
//! The console holds no canonical state. Everything it displays is an
//! eventually-consistent snapshot of backend data, kept fresh by the
//! [`Session`]'s fixed-cadence reconciliation loops and replaced
//! wholesale on every successful fetch. On top of that sit the
//! call-list [`CallPager`], the bulk [`SimulationDriver`], and the
//! [`CampaignForm`] composer for campaign creation.

pub mod compose;
pub mod error;
pub mod pager;
pub mod session;
pub mod simulation;

pub use compose::{CampaignForm, FormError, PhoneSource, split_numbers};
pub use error::CoreError;
pub use pager::{CallPager, DEFAULT_PAGE_SIZE};
pub use session::{POLL_INTERVAL, Session};
pub use simulation::{
    SimulationConfig, SimulationDriver, SimulationPhase, SimulationProgress, SimulationReport,
};
