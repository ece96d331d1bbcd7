pub mod machine;
pub mod model;
pub mod status;

pub use machine::{MeetingMachine, MeetingStartResult, MeetingStopResult, ToggleOutcome};
pub use model::{ActionItem, Decision, FollowUp, Meeting};
pub use status::{MeetingPhase, MeetingStartOptions, MeetingState, MeetingStatusHandle};
