use crate::error::Result;
use crate::repo::{HistoryRepo, StoreParams};
use crate::repo_fs::CsvHistoryRepo;

pub enum Backend {
    Csv,
}

pub fn open_repo(backend: Backend, p: StoreParams) -> Result<Box<dyn HistoryRepo>> {
    match backend {
        Backend::Csv => Ok(Box::new(CsvHistoryRepo::new(p))),
    }
}
