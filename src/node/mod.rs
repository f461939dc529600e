pub mod common;
pub mod leaf;

use serde_repr::{Deserialize_repr, Serialize_repr};

/// On-disk discriminant stored in the first header byte. Only the leaf
/// variant is ever written today; the internal variant is reserved by the
/// file format for the future split path.
#[derive(Serialize_repr, Deserialize_repr, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeType {
    Internal = 0,
    Leaf = 1,
}
