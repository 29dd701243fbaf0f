//! Scene abstraction layer.
//!
//! The core never talks to a host application directly. Everything it needs
//! from the live object graph goes through [`SceneApi`], which the host
//! bindings implement; [`mock::MemoryScene`] is the in-process
//! implementation used by tests and by the CLI's scene files.

pub mod mock;
pub mod rules;

pub use rules::{
    CREATION_RULES, CreationRule, FALLBACK_KIND, LightKind, TypePattern, classify_light_type,
    classify_with, is_light_type,
};

use crate::error::Result;
use crate::store::{AttrValue, Scalar};

/// How an attribute setter should interpret the given components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetAs {
    /// Let the scene infer the type from the attribute.
    #[default]
    Inferred,
    /// Force a string-typed set.
    String,
}

/// Core scene operations.
///
/// # Implementation Notes
///
/// - Objects are addressed by their scene-unique name
/// - Shapes are children of transforms; a transform may own several shapes
/// - `create_node` may return either the transform or the shape it created
pub trait SceneApi {
    /// Currently selected objects, in selection order.
    fn list_selected(&self) -> Result<Vec<String>>;

    /// Shape children of an object.
    fn list_shapes(&self, object: &str) -> Result<Vec<String>>;

    /// Parent transform of an object, if any.
    fn parent(&self, object: &str) -> Result<Option<String>>;

    /// Scene type string of an object.
    fn object_type(&self, object: &str) -> Result<String>;

    /// Whether an object with this name exists.
    fn object_exists(&self, name: &str) -> bool;

    /// Names of the keyable attributes of an object.
    fn list_keyable_attributes(&self, object: &str) -> Result<Vec<String>>;

    /// Names of every attribute of an object.
    fn list_attributes(&self, object: &str) -> Result<Vec<String>>;

    /// Read an attribute.
    fn get_attribute(&self, object: &str, attr: &str) -> Result<AttrValue>;

    /// Write an attribute from positional components.
    ///
    /// # Errors
    ///
    /// Returns an error if the object or attribute does not exist or the
    /// components do not fit the attribute's type.
    fn set_attribute(
        &mut self,
        object: &str,
        attr: &str,
        components: &[Scalar],
        set_as: SetAs,
    ) -> Result<()>;

    /// Create a node of `node_type` named `name`; returns the created
    /// object (transform or shape, depending on the type).
    fn create_node(&mut self, node_type: &str, name: &str) -> Result<String>;

    /// Replace the selection.
    fn select(&mut self, objects: &[String]) -> Result<()>;
}
