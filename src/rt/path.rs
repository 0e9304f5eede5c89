//! Path helpers (spec §2 "RtPath" table entry). A thin facade over
//! `std::path::PathBuf` — the spec names this as interface-only, so
//! there is no reimplementation of path-segment logic here.

use std::path::{Path, PathBuf};

pub struct RtPath {
    inner: PathBuf,
}

impl RtPath {
    pub fn new(s: &str) -> Self {
        RtPath { inner: PathBuf::from(s) }
    }

    pub fn join(&self, segment: &str) -> RtPath {
        RtPath { inner: self.inner.join(segment) }
    }

    pub fn exists(&self) -> bool {
        self.inner.exists()
    }

    pub fn is_file(&self) -> bool {
        self.inner.is_file()
    }

    pub fn is_dir(&self) -> bool {
        self.inner.is_dir()
    }

    pub fn parent(&self) -> Option<RtPath> {
        self.inner.parent().map(|p| RtPath { inner: p.to_path_buf() })
    }

    pub fn file_name(&self) -> Option<String> {
        self.inner.file_name().map(|n| n.to_string_lossy().into_owned())
    }

    pub fn extension(&self) -> Option<String> {
        self.inner.extension().map(|e| e.to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> String {
        self.inner.to_string_lossy().into_owned()
    }

    pub fn as_path(&self) -> &Path {
        &self.inner
    }
}
