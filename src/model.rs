pub mod animation;
pub mod error;
pub mod group;
pub mod registry;
pub mod selection;
pub mod tab_bar;

pub use error::GroupError;
pub use group::{Group, GroupId, GroupMember, TabbingState, UngroupState};
pub use registry::{GroupKey, GroupRegistry, RemovedMember};
pub use selection::SelectionSet;
pub use tab_bar::{ChangeState, Direction, Tab, TabBar, TabChange};
