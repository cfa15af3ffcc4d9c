pub mod palette;
pub mod primitives;
pub mod scene;
pub mod session;

// Re-export specific items to keep the API clean for the rest of the app
pub use primitives::{Color, CylinderPrimitive, Layer, Primitive, SceneObject, SpherePrimitive};
pub use scene::{render_cell, render_centers, render_guests, render_molecules, MoleculeLayers};
pub use session::RenderSession;
