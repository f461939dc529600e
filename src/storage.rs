use crate::pager::PAGE_SIZE;
#[cfg(test)]
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};

pub trait StorageFactory<'a, S: Storage + 'a> {
    fn open(&'a mut self, filename: &'a str) -> io::Result<S>;
}

pub struct FileStorageFactory;

impl<'a> StorageFactory<'a, FileStorage> for FileStorageFactory {
    fn open(&mut self, filename: &str) -> io::Result<FileStorage> {
        FileStorage::new(filename)
    }
}

/// Page-granular backing store. Production uses [`FileStorage`]; tests swap
/// in [`InMemoryStorage`] so nothing touches the filesystem.
pub trait Storage {
    fn size(&mut self) -> io::Result<u64>;
    fn read(&mut self, page_num: usize, buf: &mut [u8]) -> io::Result<()>;
    fn write(&mut self, page_num: usize, buf: &[u8]) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
}

pub struct FileStorage {
    file: File,
}

impl FileStorage {
    fn new(filename: &str) -> io::Result<FileStorage> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(filename)?;
        Ok(FileStorage { file })
    }
}

impl Storage for FileStorage {
    fn size(&mut self) -> io::Result<u64> {
        self.file.seek(SeekFrom::End(0))
    }

    fn read(&mut self, page_num: usize, buf: &mut [u8]) -> io::Result<()> {
        self.file
            .seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))?;
        self.file.read_exact(buf)
    }

    fn write(&mut self, page_num: usize, buf: &[u8]) -> io::Result<()> {
        self.file
            .seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))?;
        self.file.write_all(buf)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }
}

#[cfg(test)]
pub struct InMemoryStorageFactory {
    stores: HashMap<String, HashMap<usize, [u8; PAGE_SIZE]>>,
}

#[cfg(test)]
impl InMemoryStorageFactory {
    pub fn new() -> Self {
        Self {
            stores: HashMap::new(),
        }
    }
}

#[cfg(test)]
impl<'a> StorageFactory<'a, InMemoryStorage<'a>> for InMemoryStorageFactory {
    fn open(&'a mut self, filename: &'a str) -> io::Result<InMemoryStorage<'a>> {
        let pages = self.stores.entry(filename.to_string()).or_default();
        Ok(InMemoryStorage { pages })
    }
}

#[cfg(test)]
pub struct InMemoryStorage<'a> {
    pages: &'a mut HashMap<usize, [u8; PAGE_SIZE]>,
}

#[cfg(test)]
impl<'a> Storage for InMemoryStorage<'a> {
    fn size(&mut self) -> io::Result<u64> {
        Ok((self.pages.len() * PAGE_SIZE) as u64)
    }

    fn read(&mut self, page_num: usize, buf: &mut [u8]) -> io::Result<()> {
        if let Some(page) = self.pages.get(&page_num) {
            buf.copy_from_slice(page.as_slice());
        }
        Ok(())
    }

    fn write(&mut self, page_num: usize, buf: &[u8]) -> io::Result<()> {
        let page = self.pages.entry(page_num).or_insert([0u8; PAGE_SIZE]);
        page[..buf.len()].copy_from_slice(buf);
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_sanity() {
        let mut factory = InMemoryStorageFactory::new();
        let mut storage = factory.open("foobar").unwrap();
        let text1 = b"first";
        storage.write(0, text1).unwrap();

        let text2 = b"second";
        storage.write(1, text2).unwrap();

        let mut buf = [0u8; PAGE_SIZE];
        storage.read(0, &mut buf).unwrap();
        assert_eq!(text1, &buf[..text1.len()]);

        let mut buf = [0u8; PAGE_SIZE];
        storage.read(1, &mut buf).unwrap();
        assert_eq!(text2, &buf[..text2.len()]);
    }

    #[test]
    fn in_memory_flush_reopen() {
        let mut factory = InMemoryStorageFactory::new();
        let text1 = b"first";

        {
            let mut storage = factory.open("foobar").unwrap();
            storage.write(0, text1).unwrap();
        }

        {
            let mut storage = factory.open("foobar").unwrap();
            let mut buf = [0u8; PAGE_SIZE];
            storage.read(0, &mut buf).unwrap();
            assert_eq!(text1, &buf[..text1.len()]);
        }
    }
}
