mod job;
mod party;
mod profile;
mod progression;

pub use job::{transition_allowed, ApplicationWithProfile, Job, JobApplication, APPLICATION_STATUSES};
pub use party::{Party, PartyMember, PartyMemberWithProfile};
pub use profile::{Profile, Role};
pub use progression::{Rank, UserStats};
