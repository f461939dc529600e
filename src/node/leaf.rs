use crate::error::DbError;
use crate::node::common;
use crate::node::common::CommonNode;
use crate::node::NodeType;
use crate::pager::PAGE_SIZE;
use crate::serialization::{serialize_row, Row, ROW_SIZE};
use crate::storage::Storage;
use crate::table::Cursor;
use std::mem::size_of;

// Leaf Node Header Layout
//
// | common header | num cells |
pub(crate) const LEAF_NODE_NUM_CELLS_SIZE: usize = size_of::<u32>();
pub(crate) const LEAF_NODE_NUM_CELLS_OFFSET: usize = common::HEADER_SIZE;
pub(crate) const LEAF_NODE_HEADER_SIZE: usize = common::HEADER_SIZE + LEAF_NODE_NUM_CELLS_SIZE;

// Leaf Node Body Layout
//
// | key 0 | value 0 | key 1 | value 1 | ...
pub(crate) const LEAF_NODE_KEY_SIZE: usize = size_of::<u32>();
pub(crate) const LEAF_NODE_VALUE_SIZE: usize = ROW_SIZE;
pub(crate) const LEAF_NODE_CELL_SIZE: usize = LEAF_NODE_KEY_SIZE + LEAF_NODE_VALUE_SIZE;
pub(crate) const LEAF_NODE_SPACE_FOR_CELLS: usize = PAGE_SIZE - LEAF_NODE_HEADER_SIZE;
pub(crate) const LEAF_NODE_MAX_CELLS: usize = LEAF_NODE_SPACE_FOR_CELLS / LEAF_NODE_CELL_SIZE;

#[derive(Debug)]
pub struct LeafNode {
    pub node: CommonNode,
}

impl From<CommonNode> for LeafNode {
    fn from(node: CommonNode) -> Self {
        LeafNode { node }
    }
}

impl LeafNode {
    /// Initialize a `CommonNode` as an empty `LeafNode`.
    pub fn new(mut node: CommonNode) -> Self {
        node.set_node_type(NodeType::Leaf);
        node.set_root(false);
        node.set_parent(0);
        let mut leaf = LeafNode { node };
        leaf.set_num_cells(0);
        leaf
    }

    /// Get the number of cells currently occupied in the node.
    pub fn num_cells(&self) -> u32 {
        let buffer = self.node.get_buffer();
        u32::from_le_bytes(
            buffer[LEAF_NODE_NUM_CELLS_OFFSET..LEAF_NODE_NUM_CELLS_OFFSET + LEAF_NODE_NUM_CELLS_SIZE]
                .try_into()
                .expect("cell count field is four bytes"),
        )
    }

    /// Set the number of cells currently occupied in the node.
    pub fn set_num_cells(&mut self, num_cells: u32) {
        let buffer = self.node.get_buffer_mut();
        buffer[LEAF_NODE_NUM_CELLS_OFFSET..LEAF_NODE_NUM_CELLS_OFFSET + LEAF_NODE_NUM_CELLS_SIZE]
            .copy_from_slice(&num_cells.to_le_bytes());
    }

    fn cell_offset(cell_num: u32) -> usize {
        LEAF_NODE_HEADER_SIZE + cell_num as usize * LEAF_NODE_CELL_SIZE
    }

    pub fn key(&self, cell_num: u32) -> u32 {
        let offset = Self::cell_offset(cell_num);
        let buffer = self.node.get_buffer();
        u32::from_le_bytes(
            buffer[offset..offset + LEAF_NODE_KEY_SIZE]
                .try_into()
                .expect("key field is four bytes"),
        )
    }

    pub fn set_key(&mut self, cell_num: u32, key: u32) {
        let offset = Self::cell_offset(cell_num);
        let buffer = self.node.get_buffer_mut();
        buffer[offset..offset + LEAF_NODE_KEY_SIZE].copy_from_slice(&key.to_le_bytes());
    }

    /// Get a slice of the leaf node value.
    pub fn value(&self, cell_num: u32) -> &[u8] {
        let offset = Self::cell_offset(cell_num) + LEAF_NODE_KEY_SIZE;
        &self.node.get_buffer()[offset..offset + LEAF_NODE_VALUE_SIZE]
    }

    /// Get a mutable slice of the leaf node value.
    pub fn value_mut(&mut self, cell_num: u32) -> &mut [u8] {
        let offset = Self::cell_offset(cell_num) + LEAF_NODE_KEY_SIZE;
        &mut self.node.get_buffer_mut()[offset..offset + LEAF_NODE_VALUE_SIZE]
    }
}

pub(crate) fn leaf_node_insert<T: Storage>(
    cursor: Cursor<'_, T>,
    key: u32,
    value: &Row,
) -> Result<(), DbError> {
    let mut node = cursor.table.pager.page(cursor.page_num as usize)?;

    let num_cells = node.num_cells();
    // A full node would need to split into a sibling leaf; execute_insert
    // refuses the row before that can happen.
    // TODO: split the node once internal nodes exist.
    debug_assert!(num_cells < LEAF_NODE_MAX_CELLS as u32);

    if cursor.cell_num < num_cells {
        // Make room for new cell
        let start = LeafNode::cell_offset(cursor.cell_num);
        let end = LeafNode::cell_offset(num_cells);
        node.node
            .get_buffer_mut()
            .copy_within(start..end, start + LEAF_NODE_CELL_SIZE);
    }

    node.set_num_cells(num_cells + 1);
    node.set_key(cursor.cell_num, key);
    serialize_row(value, node.value_mut(cursor.cell_num));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_constants_match_the_file_format() {
        assert_eq!(LEAF_NODE_HEADER_SIZE, 10);
        assert_eq!(LEAF_NODE_CELL_SIZE, 297);
        assert_eq!(LEAF_NODE_SPACE_FOR_CELLS, 4086);
        assert_eq!(LEAF_NODE_MAX_CELLS, 13);
    }

    #[test]
    fn new_leaf_sets_type_byte_and_zero_cells() {
        let mut page = Box::new([0xffu8; PAGE_SIZE]);
        let node = CommonNode::new(page.as_mut_ptr());
        // 0xff is not a valid type byte until the leaf is initialized.
        assert!(node.is_err());

        page[common::NODE_TYPE_OFFSET] = 0;
        page[common::IS_ROOT_OFFSET] = 0;
        let node = CommonNode::new(page.as_mut_ptr()).unwrap();
        let leaf = LeafNode::new(node);

        assert_eq!(page[common::NODE_TYPE_OFFSET], 1);
        assert_eq!(leaf.num_cells(), 0);
    }

    #[test]
    fn keys_and_values_land_in_their_cells() {
        let mut page = Box::new([0u8; PAGE_SIZE]);
        let node = CommonNode::new(page.as_mut_ptr()).unwrap();
        let mut leaf = LeafNode::new(node);

        leaf.set_num_cells(2);
        leaf.set_key(0, 11);
        leaf.set_key(1, 22);
        leaf.value_mut(1)[..3].copy_from_slice(b"abc");

        assert_eq!(leaf.num_cells(), 2);
        assert_eq!(leaf.key(0), 11);
        assert_eq!(leaf.key(1), 22);

        // Cell 1 starts at 10 + 297; its value starts 4 bytes later.
        assert_eq!(&page[10 + 297..10 + 297 + 4], &22u32.to_le_bytes());
        assert_eq!(&page[10 + 297 + 4..10 + 297 + 7], b"abc");
    }
}
