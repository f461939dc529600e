use crate::error::DbError;
use crate::node::NodeType;
use crate::pager::PAGE_SIZE;
use serde::de::Unexpected;
use serde::{Deserialize, Deserializer, Serialize};
use std::mem::size_of;

// Common Node Header Layout
//
// | type | is root | parent |
pub const NODE_TYPE_SIZE: usize = size_of::<u8>();
pub const NODE_TYPE_OFFSET: usize = 0;
pub const IS_ROOT_SIZE: usize = size_of::<u8>();
pub const IS_ROOT_OFFSET: usize = NODE_TYPE_OFFSET + NODE_TYPE_SIZE;
pub const PARENT_POINTER_SIZE: usize = size_of::<u32>();
pub const PARENT_POINTER_OFFSET: usize = IS_ROOT_OFFSET + IS_ROOT_SIZE;
pub const HEADER_SIZE: usize = NODE_TYPE_SIZE + IS_ROOT_SIZE + PARENT_POINTER_SIZE;

#[derive(Debug, Serialize, Deserialize)]
pub struct Header {
    pub r#type: NodeType,
    #[serde(deserialize_with = "bool_from_int")]
    pub is_root: bool,
    pub parent: u32,
}

fn bool_from_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match u8::deserialize(deserializer)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(serde::de::Error::invalid_value(
            Unexpected::Unsigned(other as u64),
            &"zero or one",
        )),
    }
}

/// A typed view over one page buffer. The header is decoded once at
/// construction; setters keep the cached copy and the buffer in step.
#[derive(Debug)]
pub struct CommonNode {
    buffer: *mut u8,
    header: Header,
}

impl CommonNode {
    /// Creates a CommonNode over a page buffer, decoding its header.
    pub fn new(buffer: *mut u8) -> Result<CommonNode, DbError> {
        let slice = unsafe { std::slice::from_raw_parts(buffer, HEADER_SIZE) };
        let header = bincode::deserialize(slice)?;
        Ok(CommonNode { buffer, header })
    }

    /// Gets the buffer as a slice.
    pub fn get_buffer(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.buffer, PAGE_SIZE) }
    }

    /// Gets the buffer as a mut slice.
    pub fn get_buffer_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.buffer, PAGE_SIZE) }
    }

    /// Gets the node type.
    pub fn node_type(&self) -> NodeType {
        self.header.r#type
    }

    /// Sets the node type.
    pub fn set_node_type(&mut self, node_type: NodeType) {
        self.header.r#type = node_type;
        self.write_header();
    }

    /// Sets whether this node is the root.
    pub fn set_root(&mut self, is_root: bool) {
        self.header.is_root = is_root;
        self.write_header();
    }

    /// Sets the page number of the parent node.
    pub fn set_parent(&mut self, parent: u32) {
        self.header.parent = parent;
        self.write_header();
    }

    fn write_header(&mut self) {
        let encoded = bincode::serialize(&self.header).expect("header always fits its fixed slot");
        self.get_buffer_mut()[..HEADER_SIZE].copy_from_slice(&encoded);
    }
}
