pub mod attendance;
pub mod calculator;
pub mod clock;
pub mod dedup;
pub mod ledger;
pub mod location;
pub mod locks;
pub mod log;
pub mod logic;
pub mod policy;
pub mod tracker;

pub use attendance::{AttendanceStateMachine, CheckoutOutcome, ConfirmationRequest};
pub use clock::{Clock, ManualClock, SystemClock};
pub use ledger::{ActivityLedger, ActivityListing};
pub use tracker::{Tracker, TrackingSettings};
