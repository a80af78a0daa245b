//! Per-player flashlights: toggle state, light placement, visibility
//! filtering and session cleanup for a host game engine.

pub mod attachment;
pub mod buttons;
pub mod host;
mod light;
pub mod plugin;
pub mod session;
pub mod sim;
pub mod tick;
pub mod toggle;
pub mod transform;
pub mod visibility;

pub use attachment::AttachmentLifecycle;
pub use buttons::{ActivationInput, Buttons};
pub use host::{EntityHandle, Host, LightWorld, PlayerId, PlayerInfo, PlayerPose, PlayerSource};
pub use light::{AttachedLight, LIGHT_CLASS, LightColor, LightParams, LightTint};
pub use plugin::{CommandError, FlashlightPlugin, FlashlightSettings, ToggleOutcome, command_names};
pub use session::{PlayerSession, SessionRegistry};
pub use sim::{SimHost, SimLight, SimPlayer};
pub use tick::{TickDriver, TickReport};
pub use toggle::{TOGGLE_COOLDOWN, ToggleSource, ToggleStateMachine};
pub use transform::{LightTransform, OffsetPolicy, TransformResolver, direction_offset};
pub use visibility::{TransmitInfo, VisibilityFilter};
