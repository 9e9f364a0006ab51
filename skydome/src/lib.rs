pub mod annotation;
pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod interaction;
pub mod picking;
pub mod placement;
pub mod scene;

pub mod prelude {
    pub use crate::annotation::{AnnotationId, Annotations, LabelId, LinkId};
    pub use crate::catalog::{
        CatalogConfig, LoadReport, RawCatalog, StarCatalog, StarId, StarInfo, StarInstance,
    };
    pub use crate::config::SkyConfig;
    pub use crate::error::SkyError;
    pub use crate::frame::SkyFrame;
    pub use crate::interaction::{InteractionMode, PointerInteraction};
    pub use crate::picking::{Camera, HitTester, PerspectiveCamera, Raycaster, Viewport};
    pub use crate::placement::{SizePolicy, SKY_RADIUS};
    pub use crate::scene::{FrameOutput, InputEvent, SceneOutcome, SkyScene};
}
