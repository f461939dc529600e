use crate::error::DbError;
use crate::node::common::CommonNode;
use crate::node::leaf::LeafNode;
use crate::node::NodeType;
use crate::storage::{Storage, StorageFactory};
use log::debug;

pub const TABLE_MAX_PAGES: usize = 100;
pub const PAGE_SIZE: usize = 4096;

/// Write-back page cache over a [`Storage`] backend. Pages load on demand,
/// stay resident until close, and are written out as whole pages.
pub struct Pager<T> {
    storage: T,
    file_length: u32,
    pub num_pages: u32,
    pages: [Option<Box<[u8; PAGE_SIZE]>>; TABLE_MAX_PAGES],
}

impl<'a, T: Storage + 'a> Pager<T> {
    pub fn open<F: StorageFactory<'a, T>>(
        storage_factory: &'a mut F,
        filename: &'a str,
    ) -> Result<Pager<T>, DbError> {
        let mut storage = storage_factory.open(filename)?;

        let file_length = storage.size()?;
        if file_length as usize % PAGE_SIZE != 0 {
            return Err(DbError::CorruptFileLength);
        }
        debug!(
            "opened {filename}: {file_length} bytes, {} pages on disk",
            file_length as usize / PAGE_SIZE
        );

        Ok(Pager {
            storage,
            file_length: file_length as u32,
            num_pages: file_length as u32 / PAGE_SIZE as u32,
            pages: std::array::from_fn(|_| None),
        })
    }

    /// Flushes every loaded page and syncs the backing storage. The cache
    /// carries no per-page dirty bit, so every resident page is written.
    pub fn close(mut self) -> Result<(), DbError> {
        for i in 0..self.num_pages as usize {
            if self.pages[i].is_none() {
                continue;
            }
            self.flush(i)?;
            self.pages[i] = None;
        }
        self.storage.sync()?;
        debug!("pager closed, {} pages flushed", self.num_pages);
        Ok(())
    }

    /// Gets the page as a leaf node.
    pub fn page(&mut self, page_num: usize) -> Result<LeafNode, DbError> {
        let node = self.get_page(page_num)?;
        match node.node_type() {
            NodeType::Leaf => Ok(LeafNode::from(node)),
            NodeType::Internal => Err(DbError::UnexpectedInternalNode { page_num }),
        }
    }

    /// Gets the page and initializes it as an empty leaf node.
    pub fn new_leaf_page(&mut self, page_num: usize) -> Result<LeafNode, DbError> {
        let node = self.get_page(page_num)?;
        Ok(LeafNode::new(node))
    }

    fn get_page(&mut self, page_num: usize) -> Result<CommonNode, DbError> {
        if page_num >= TABLE_MAX_PAGES {
            return Err(DbError::PageOutOfBounds {
                page_num,
                max: TABLE_MAX_PAGES,
            });
        }

        if self.pages[page_num].is_none() {
            // Cache miss. Allocate memory and load from file.
            debug!("page {page_num} cache miss");
            let mut page = Box::new([0u8; PAGE_SIZE]);
            let pages_on_disk = self.file_length as usize / PAGE_SIZE;

            if page_num < pages_on_disk {
                self.storage.read(page_num, page.as_mut_slice())?;
            }

            self.pages[page_num] = Some(page);

            if page_num >= self.num_pages as usize {
                self.num_pages = page_num as u32 + 1;
            }
        }

        let buffer = self.pages[page_num].as_mut().unwrap().as_mut_ptr();
        CommonNode::new(buffer)
    }

    fn flush(&mut self, page_num: usize) -> Result<(), DbError> {
        let page = self.pages[page_num].as_ref().ok_or(DbError::FlushNullPage)?;
        self.storage.write(page_num, page.as_slice())?;
        Ok(())
    }
}
