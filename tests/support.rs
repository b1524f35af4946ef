use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use loopmount::xdr::nfs3::{fattr3, ftype3, nfsstat3};
use loopmount::{DirContents, FileId, FsId, Volume};

enum Node {
    Dir,
    File(&'static [u8]),
}

/// Small in-memory volume with a fixed tree:
///
/// ```text
/// /                 id 1
/// /hello.txt        id 2
/// /docs             id 5
/// /docs/report.txt  id 9
/// ```
pub struct DemoVolume {
    id: FsId,
    mountpoint: PathBuf,
    nodes: BTreeMap<&'static str, (FileId, Node)>,
}

impl DemoVolume {
    pub fn new(id: FsId, mountpoint: &str) -> DemoVolume {
        let mut nodes = BTreeMap::new();
        nodes.insert("/", (1, Node::Dir));
        nodes.insert("/hello.txt", (2, Node::File(b"Hello from loopmount!\n" as &[u8])));
        nodes.insert("/docs", (5, Node::Dir));
        nodes.insert("/docs/report.txt", (9, Node::File(b"quarterly numbers\n" as &[u8])));
        DemoVolume { id, mountpoint: PathBuf::from(mountpoint), nodes }
    }
}

#[async_trait]
impl Volume for DemoVolume {
    fn identifier(&self) -> FsId {
        self.id
    }

    fn mountpoint(&self) -> &Path {
        &self.mountpoint
    }

    fn reverse_lookup(&self, file: FileId) -> Option<String> {
        self.nodes
            .iter()
            .find(|(_, (id, _))| *id == file)
            .map(|(path, _)| (*path).to_string())
    }

    fn file_id(&self, path: &str) -> Option<FileId> {
        self.nodes.get(path).map(|(id, _)| *id)
    }

    async fn getattr(&self, path: &str) -> Result<fattr3, nfsstat3> {
        let (id, node) = self.nodes.get(path).ok_or(nfsstat3::NFS3ERR_NOENT)?;
        let mut attr = fattr3 { fileid: *id as u64, nlink: 1, ..Default::default() };
        match node {
            Node::Dir => {
                attr.ftype = ftype3::NF3DIR;
                attr.mode = 0o555;
            }
            Node::File(data) => {
                attr.ftype = ftype3::NF3REG;
                attr.mode = 0o444;
                attr.size = data.len() as u64;
                attr.used = data.len() as u64;
            }
        }
        Ok(attr)
    }

    async fn read(
        &self,
        path: &str,
        offset: u64,
        count: u32,
    ) -> Result<(Vec<u8>, bool), nfsstat3> {
        match self.nodes.get(path) {
            Some((_, Node::File(data))) => {
                let start = (offset as usize).min(data.len());
                let end = start.saturating_add(count as usize).min(data.len());
                Ok((data[start..end].to_vec(), end == data.len()))
            }
            Some((_, Node::Dir)) => Err(nfsstat3::NFS3ERR_ISDIR),
            None => Err(nfsstat3::NFS3ERR_NOENT),
        }
    }

    async fn readdir(&self, path: &str) -> Result<DirContents, nfsstat3> {
        match self.nodes.get(path) {
            Some((_, Node::Dir)) => {}
            Some(_) => return Err(nfsstat3::NFS3ERR_NOTDIR),
            None => return Err(nfsstat3::NFS3ERR_NOENT),
        }
        let prefix = if path == "/" { "/".to_string() } else { format!("{path}/") };
        Ok(self
            .nodes
            .keys()
            .filter(|entry| {
                **entry != path
                    && entry.starts_with(&prefix)
                    && !entry[prefix.len()..].contains('/')
            })
            .map(|entry| &entry[prefix.len()..])
            .collect())
    }
}
