//! Minimal ROOT file writer for building test fixtures.
//!
//! Produces small-format (32-bit seek) files holding TH1D histograms and
//! TGraphAsymmErrors graphs in nested directories. Only the fields the reader
//! consumes carry meaningful values.

use std::io::Write;
use std::path::Path;

use crate::objects::{GraphData, TH1Data};

const BYTE_COUNT_MASK: u32 = 0x4000_0000;
const HEADER_LEN: usize = 64;
const FILE_VERSION: u32 = 62206;

enum Node {
    Hist(TH1Data),
    Graph(GraphData),
    Dir(Vec<(String, Node)>),
}

/// Builds an in-memory ROOT file.
#[derive(Default)]
pub struct RootFileBuilder {
    top: Vec<(String, Node)>,
    zlib: bool,
}

impl RootFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store object payloads zlib-compressed.
    pub fn zlib(mut self, on: bool) -> Self {
        self.zlib = on;
        self
    }

    /// Store `hist` at `path`; the last component is the key name.
    pub fn histogram(mut self, path: &str, hist: TH1Data) -> Self {
        self.insert(path, Node::Hist(hist));
        self
    }

    /// Store `graph` (as TGraphAsymmErrors) at `path`.
    pub fn graph(mut self, path: &str, graph: GraphData) -> Self {
        self.insert(path, Node::Graph(graph));
        self
    }

    fn insert(&mut self, path: &str, node: Node) {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let Some((leaf, dirs)) = parts.split_last() else {
            return;
        };
        let mut level = &mut self.top;
        for dir in dirs {
            let existing =
                level.iter().position(|(n, e)| n.as_str() == *dir && matches!(e, Node::Dir(_)));
            let idx = match existing {
                Some(i) => i,
                None => {
                    level.push((dir.to_string(), Node::Dir(Vec::new())));
                    level.len() - 1
                }
            };
            level = match &mut level[idx].1 {
                Node::Dir(children) => children,
                _ => unreachable!("position() matched a directory"),
            };
        }
        level.push((leaf.to_string(), node));
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_LEN];
        out[0..4].copy_from_slice(b"root");
        out[4..8].copy_from_slice(&FILE_VERSION.to_be_bytes());
        out[8..12].copy_from_slice(&(HEADER_LEN as u32).to_be_bytes());

        // Top directory streamer sits at fBEGIN (fNbytesName = 0).
        let top_dir = out.len();
        let placeholder = directory_streamer(0);
        out.extend_from_slice(&placeholder);
        let seek_keys = self.write_dir(&mut out, &self.top);
        out[top_dir..top_dir + placeholder.len()].copy_from_slice(&directory_streamer(seek_keys));

        let end = out.len() as u32;
        out[12..16].copy_from_slice(&end.to_be_bytes());
        out
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.to_bytes())
    }

    /// Write the entries of one directory, then its key list. Returns the
    /// offset of the key list.
    fn write_dir(&self, out: &mut Vec<u8>, entries: &[(String, Node)]) -> u32 {
        let mut keys = Vec::with_capacity(entries.len());
        for (name, node) in entries {
            let (class, payload) = match node {
                Node::Hist(h) => ("TH1D", th1d_payload(h)),
                Node::Graph(g) => ("TGraphAsymmErrors", graph_payload(g)),
                Node::Dir(children) => {
                    let child_keys = self.write_dir(out, children);
                    ("TDirectoryFile", directory_streamer(child_keys))
                }
            };
            let stored = match (self.zlib, node) {
                (true, Node::Hist(_) | Node::Graph(_)) => zlib_block(&payload),
                _ => payload.clone(),
            };
            let seek = out.len() as u32;
            let header = key_header(seek, stored.len(), payload.len(), class, name);
            out.extend_from_slice(&header);
            out.extend_from_slice(&stored);
            keys.push(header);
        }

        let seek_list = out.len() as u32;
        let mut body = (keys.len() as u32).to_be_bytes().to_vec();
        for k in &keys {
            body.extend_from_slice(k);
        }
        out.extend(key_header(seek_list, body.len(), body.len(), "KeysList", ""));
        out.extend(body);
        seek_list
    }
}

fn key_header(seek: u32, stored_len: usize, obj_len: usize, class: &str, name: &str) -> Vec<u8> {
    let mut strings = ByteWriter::default();
    strings.string(class);
    strings.string(name);
    strings.string("");
    let key_len = 26 + strings.buf.len();

    let mut w = ByteWriter::default();
    w.u32((key_len + stored_len) as u32);
    w.u16(4);
    w.u32(obj_len as u32);
    w.u32(0); // datime
    w.u16(key_len as u16);
    w.u16(1); // cycle
    w.u32(seek);
    w.u32(0); // seek_pdir
    w.buf.extend(strings.buf);
    w.buf
}

fn directory_streamer(seek_keys: u32) -> Vec<u8> {
    let mut w = ByteWriter::default();
    w.u16(5);
    w.u32(0);
    w.u32(0);
    w.u32(0);
    w.u32(0);
    w.u32(0);
    w.u32(0);
    w.u32(seek_keys);
    w.buf
}

fn zlib_block(payload: &[u8]) -> Vec<u8> {
    let mut enc = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(payload).expect("write to Vec");
    let compressed = enc.finish().expect("finish zlib stream");
    let mut out = b"ZL\x08".to_vec();
    out.extend_from_slice(&(compressed.len() as u32).to_le_bytes()[..3]);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes()[..3]);
    out.extend(compressed);
    out
}

fn th1d_payload(h: &TH1Data) -> Vec<u8> {
    let n_cells = h.cells.len();
    let mut w = ByteWriter::default();
    let outer = w.begin(3);
    let th1 = w.begin(8);
    w.tnamed(&h.name, &h.title);
    w.empty_object(2); // TAttLine
    w.empty_object(2); // TAttFill
    w.empty_object(2); // TAttMarker
    w.i32(n_cells as i32);
    w.axis("xaxis", &h.edges);
    w.axis("yaxis", &[0.0, 1.0]);
    w.axis("zaxis", &[0.0, 1.0]);
    w.i16(0);
    w.i16(1000);
    w.f64(h.entries);
    for _ in 0..4 {
        w.f64(0.0);
    }
    w.f64(-1111.0);
    w.f64(-1111.0);
    w.f64(0.0);
    w.u32(0); // fContour
    match &h.sumw2 {
        Some(s) => {
            w.u32(s.len() as u32);
            s.iter().for_each(|&v| w.f64(v));
        }
        None => w.u32(0),
    }
    w.string("");
    w.end(th1);
    w.u32(n_cells as u32);
    h.cells.iter().for_each(|&v| w.f64(v));
    w.end(outer);
    w.buf
}

fn graph_payload(g: &GraphData) -> Vec<u8> {
    let mut w = ByteWriter::default();
    let outer = w.begin(3);
    let base = w.begin(4);
    w.tnamed(&g.name, &g.title);
    w.empty_object(2);
    w.empty_object(2);
    w.empty_object(2);
    w.i32(g.x.len() as i32);
    w.counted(&g.x);
    w.counted(&g.y);
    w.end(base);
    w.counted(&g.ex_low);
    w.counted(&g.ex_high);
    w.counted(&g.ey_low);
    w.counted(&g.ey_high);
    w.end(outer);
    w.buf
}

#[derive(Default)]
struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn string(&mut self, s: &str) {
        if s.len() < 255 {
            self.buf.push(s.len() as u8);
        } else {
            self.buf.push(255);
            self.u32(s.len() as u32);
        }
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Start a versioned object; returns the position of its byte count.
    fn begin(&mut self, version: u16) -> usize {
        let at = self.buf.len();
        self.u32(0);
        self.u16(version);
        at
    }

    fn end(&mut self, at: usize) {
        let count = (self.buf.len() - at - 4) as u32 | BYTE_COUNT_MASK;
        self.buf[at..at + 4].copy_from_slice(&count.to_be_bytes());
    }

    fn empty_object(&mut self, version: u16) {
        let at = self.begin(version);
        self.end(at);
    }

    fn tnamed(&mut self, name: &str, title: &str) {
        let at = self.begin(1);
        self.u16(1);
        self.u32(0);
        self.u32(0x0300_0000);
        self.string(name);
        self.string(title);
        self.end(at);
    }

    fn axis(&mut self, name: &str, edges: &[f64]) {
        let at = self.begin(10);
        self.tnamed(name, "");
        self.empty_object(4); // TAttAxis
        let n = edges.len().saturating_sub(1);
        self.i32(n as i32);
        self.f64(edges.first().copied().unwrap_or(0.0));
        self.f64(edges.last().copied().unwrap_or(1.0));
        self.u32(edges.len() as u32);
        edges.iter().for_each(|&v| self.f64(v));
        self.end(at);
    }

    fn counted(&mut self, values: &[f64]) {
        self.buf.push(1);
        values.iter().for_each(|&v| self.f64(v));
    }
}
