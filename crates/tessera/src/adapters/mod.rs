//! # Host Adapters
//!
//! The game never polls devices or builds display objects itself. The host
//! plugs these in:
//!
//! - [`InputSource`] - one [`InputFrame`] per frame
//! - [`ViewFactory`] - one display object per entity that gains a sprite

mod input;
mod view;

pub use input::{ButtonState, InputFrame, InputScript, InputSource, ScriptedInput};
pub use view::{RecordingViewFactory, ViewFactory, ViewHandle, ViewRecord};
