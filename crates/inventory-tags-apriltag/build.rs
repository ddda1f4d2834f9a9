//! Compiles the tag family tables in `data/` (`*.json`, or upstream AprilTag
//! `*.c` sources) into `$OUT_DIR/builtins.rs`.

use serde::Deserialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::{env, fs};

#[allow(dead_code)]
#[path = "src/geometry.rs"]
mod geometry;

#[allow(dead_code)]
#[path = "src/c_source.rs"]
mod c_source;

#[derive(Deserialize)]
struct FamilyFile {
    name: String,
    total_width: usize,
    min_hamming: u32,
    layout: Vec<String>,
    codes: Vec<u64>,
}

/// `tagStandard41h12` -> `TAG_STANDARD_41H12`
fn const_prefix(name: &str) -> String {
    let mut out = String::new();
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if let Some(p) = prev {
            let boundary = (p.is_ascii_lowercase() && c.is_ascii_uppercase())
                || (p.is_ascii_alphabetic() && c.is_ascii_digit());
            if boundary {
                out.push('_');
            }
        }
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push('_');
        }
        prev = Some(c);
    }
    out
}

fn check(path: &Path, fam: &FamilyFile) {
    let w = fam.total_width;
    assert!(
        fam.layout.len() == w && fam.layout.iter().all(|r| r.len() == w),
        "{}: layout must be {w}x{w}",
        path.display()
    );
    assert!(
        !fam.codes.is_empty(),
        "{}: family has no codes",
        path.display()
    );
}

fn from_c_source(path: &Path, raw: &str) -> FamilyFile {
    let fam = c_source::parse_family_source(raw)
        .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
    FamilyFile {
        layout: geometry::standard_rows(fam.total_width),
        name: fam.name,
        total_width: fam.total_width,
        min_hamming: fam.min_hamming,
        codes: fam.codes,
    }
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let data_dir = manifest_dir.join("data");
    println!("cargo:rerun-if-changed={}", data_dir.display());
    println!("cargo:rerun-if-changed=src/geometry.rs");
    println!("cargo:rerun-if-changed=src/c_source.rs");

    let mut paths: Vec<PathBuf> = fs::read_dir(&data_dir)
        .expect("read data dir")
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json" || ext == "c"))
        .collect();
    paths.sort();

    let mut src = String::new();
    let mut arms = String::new();
    let mut names = Vec::new();

    for path in &paths {
        println!("cargo:rerun-if-changed={}", path.display());
        let raw = fs::read_to_string(path).expect("read family table");
        let fam = if path.extension().is_some_and(|ext| ext == "c") {
            from_c_source(path, &raw)
        } else {
            serde_json::from_str::<FamilyFile>(&raw)
                .unwrap_or_else(|e| panic!("{}: {e}", path.display()))
        };
        check(path, &fam);
        assert!(
            !names.contains(&fam.name),
            "{}: family {} is defined twice in data/",
            path.display(),
            fam.name
        );

        let prefix = const_prefix(&fam.name);
        let _ = writeln!(src, "/// Layout rows of `{}`.", fam.name);
        let _ = writeln!(
            src,
            "pub static {prefix}_LAYOUT: [&str; {}] = {:?};",
            fam.layout.len(),
            fam.layout
        );
        let _ = writeln!(src, "/// Code table of `{}`.", fam.name);
        let _ = writeln!(
            src,
            "pub static {prefix}_CODES: [u64; {}] = [",
            fam.codes.len()
        );
        for chunk in fam.codes.chunks(4) {
            let line: Vec<String> = chunk.iter().map(|c| format!("0x{c:012x}")).collect();
            let _ = writeln!(src, "    {},", line.join(", "));
        }
        let _ = writeln!(src, "];\n");

        let _ = writeln!(
            arms,
            "        {:?} => TagFamily::from_static({:?}, {}, &{prefix}_LAYOUT, &{prefix}_CODES).ok(),",
            fam.name, fam.name, fam.min_hamming
        );
        names.push(fam.name);
    }

    let _ = writeln!(src, "/// Names of all built-in tag families.");
    let _ = writeln!(
        src,
        "pub const BUILTIN_FAMILY_NAMES: &[&str] = &{:?};\n",
        names
    );
    let _ = writeln!(src, "/// Look up a built-in tag family by name.");
    let _ = writeln!(
        src,
        "pub fn builtin_family(name: &str) -> Option<TagFamily> {{"
    );
    let _ = writeln!(src, "    match name {{");
    src.push_str(&arms);
    let _ = writeln!(src, "        _ => None,");
    let _ = writeln!(src, "    }}");
    let _ = writeln!(src, "}}");

    let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR")).join("builtins.rs");
    fs::write(out, src).expect("write builtins.rs");
}
