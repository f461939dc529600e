use crate::error::DbError;
use crate::node::leaf::LeafNode;
use crate::pager::Pager;
use crate::storage::{Storage, StorageFactory};
use log::debug;

pub struct Table<T> {
    pub pager: Pager<T>,
    pub root_page_num: u32,
}

impl<'a, T: Storage + 'a> Table<T> {
    pub fn open<F: StorageFactory<'a, T>>(
        storage_factory: &'a mut F,
        filename: &'a str,
    ) -> Result<Table<T>, DbError> {
        let mut pager = Pager::open(storage_factory, filename)?;

        if pager.num_pages == 0 {
            // New database file. Initialize page 0 as leaf node.
            let mut root_node = pager.new_leaf_page(0)?;
            root_node.node.set_root(true);
            debug!("initialized {filename} with an empty root leaf");
        }

        Ok(Table {
            pager,
            root_page_num: 0,
        })
    }

    pub fn close(self) -> Result<(), DbError> {
        self.pager.close()
    }

    /// Cursor at the first row; `end_of_table` when the table is empty.
    pub fn start(&mut self) -> Result<Cursor<'_, T>, DbError> {
        let page_num = self.root_page_num;
        let node = self.pager.page(page_num as usize)?;
        let end_of_table = node.num_cells() == 0;

        Ok(Cursor {
            node,
            page_num,
            cell_num: 0,
            end_of_table,
            table: self,
        })
    }

    /// Cursor one past the last row; the append insertion point.
    pub fn end(&mut self) -> Result<Cursor<'_, T>, DbError> {
        let page_num = self.root_page_num;
        let node = self.pager.page(page_num as usize)?;
        let cell_num = node.num_cells();

        Ok(Cursor {
            node,
            page_num,
            cell_num,
            end_of_table: true,
            table: self,
        })
    }
}

pub struct Cursor<'a, T> {
    pub table: &'a mut Table<T>,
    node: LeafNode,
    pub page_num: u32,
    pub cell_num: u32,
    /// Indicates a position one past the last element
    pub end_of_table: bool,
}

impl<'a, T: Storage> Cursor<'a, T> {
    /// The value slot of the current cell.
    pub fn value(&self) -> &[u8] {
        self.node.value(self.cell_num)
    }

    pub fn advance(&mut self) -> Result<(), DbError> {
        let node = self.table.pager.page(self.page_num as usize)?;

        self.cell_num += 1;
        if self.cell_num >= node.num_cells() {
            self.end_of_table = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorageFactory;

    #[test]
    fn open_initializes_the_root_leaf() {
        let mut factory = InMemoryStorageFactory::new();
        let mut table = Table::open(&mut factory, "fresh.db").unwrap();

        assert_eq!(table.root_page_num, 0);
        let root = table.pager.page(0).unwrap();
        assert_eq!(root.num_cells(), 0);
    }

    #[test]
    fn start_cursor_on_empty_table_is_at_the_end() {
        let mut factory = InMemoryStorageFactory::new();
        let mut table = Table::open(&mut factory, "empty.db").unwrap();

        let cursor = table.start().unwrap();
        assert!(cursor.end_of_table);
        assert_eq!(cursor.cell_num, 0);
    }

    #[test]
    fn end_cursor_sits_one_past_the_last_cell() {
        let mut factory = InMemoryStorageFactory::new();
        let mut table = Table::open(&mut factory, "end.db").unwrap();

        {
            let mut root = table.pager.page(0).unwrap();
            root.set_num_cells(3);
        }

        let cursor = table.end().unwrap();
        assert!(cursor.end_of_table);
        assert_eq!(cursor.cell_num, 3);
    }
}
