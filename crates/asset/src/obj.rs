//! Wavefront OBJ parser: positions, texture coordinates, normals, faces,
//! lines, points and `o`/`g` groups. Materials and smoothing groups are
//! skipped.

use std::io::{self, BufRead};

use crate::import::ImportError;

/// One face corner: 0-based indices into the document's attribute arrays.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Corner {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

/// Faces sharing an `o`/`g` name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjGroup {
    pub name: String,
    pub faces: Vec<Vec<Corner>>,
}

/// Parsed OBJ file before any vertex building.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjDocument {
    pub positions: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub groups: Vec<ObjGroup>,
}

pub fn parse_obj_str(contents: &str) -> Result<ObjDocument, ImportError> {
    parse_obj(io::Cursor::new(contents))
}

pub fn parse_obj<R: BufRead>(reader: R) -> Result<ObjDocument, ImportError> {
    let mut doc = ObjDocument::default();
    let mut current = ObjGroup {
        name: "default".to_owned(),
        faces: Vec::new(),
    };

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.map_err(|source| ImportError::Read {
            line: line_no,
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => {
                let x = parse_f32(parts.next(), line_no, "x coordinate")?;
                let y = parse_f32(parts.next(), line_no, "y coordinate")?;
                let z = parse_f32(parts.next(), line_no, "z coordinate")?;
                doc.positions.push([x, y, z]);
            }
            "vt" => {
                let u = parse_f32(parts.next(), line_no, "u coordinate")?;
                // `vt u` alone is legal; v defaults to 0.
                let v = match parts.next() {
                    Some(token) => parse_f32(Some(token), line_no, "v coordinate")?,
                    None => 0.0,
                };
                doc.texcoords.push([u, v]);
            }
            "vn" => {
                let nx = parse_f32(parts.next(), line_no, "nx coordinate")?;
                let ny = parse_f32(parts.next(), line_no, "ny coordinate")?;
                let nz = parse_f32(parts.next(), line_no, "nz coordinate")?;
                doc.normals.push([nx, ny, nz]);
            }
            "f" | "l" | "p" => {
                let corners = parts
                    .map(|token| parse_corner(token, &doc, line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                match tag {
                    "f" if corners.len() < 3 => {
                        return Err(ImportError::parse(
                            line_no,
                            format!("face needs at least 3 corners, got {}", corners.len()),
                        ));
                    }
                    "f" => current.faces.push(corners),
                    "l" if corners.len() < 2 => {
                        return Err(ImportError::parse(line_no, "line needs at least 2 corners"));
                    }
                    // A polyline becomes one segment per consecutive pair.
                    "l" => current
                        .faces
                        .extend(corners.windows(2).map(|pair| pair.to_vec())),
                    _ => current.faces.extend(corners.into_iter().map(|c| vec![c])),
                }
            }
            "o" | "g" => {
                let name = parts.collect::<Vec<_>>().join(" ");
                let name = if name.is_empty() { "default".to_owned() } else { name };
                if current.faces.is_empty() {
                    current.name = name;
                } else {
                    let finished = std::mem::replace(
                        &mut current,
                        ObjGroup {
                            name,
                            faces: Vec::new(),
                        },
                    );
                    doc.groups.push(finished);
                }
            }
            _ => {
                // mtllib/usemtl/s and friends carry nothing we keep
            }
        }
    }

    if !current.faces.is_empty() {
        doc.groups.push(current);
    }
    Ok(doc)
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str) -> Result<f32, ImportError> {
    let token = value.ok_or_else(|| ImportError::parse(line_no, format!("missing {what}")))?;
    token
        .parse::<f32>()
        .map_err(|e| ImportError::parse(line_no, format!("bad {what} '{token}': {e}")))
}

fn parse_corner(token: &str, doc: &ObjDocument, line_no: usize) -> Result<Corner, ImportError> {
    let mut split = token.split('/');
    let pos = split.next().unwrap_or_default();
    let position = resolve_index(pos, doc.positions.len(), line_no)?;

    let texcoord = match split.next() {
        Some(value) if !value.is_empty() => {
            Some(resolve_index(value, doc.texcoords.len(), line_no)?)
        }
        _ => None,
    };

    let normal = match split.next() {
        Some(value) if !value.is_empty() => Some(resolve_index(value, doc.normals.len(), line_no)?),
        _ => None,
    };

    Ok(Corner {
        position,
        texcoord,
        normal,
    })
}

/// 1-based index, or negative index relative to the end of what has been
/// declared so far.
fn resolve_index(token: &str, len: usize, line_no: usize) -> Result<usize, ImportError> {
    let raw = token
        .parse::<i64>()
        .map_err(|_| ImportError::parse(line_no, format!("invalid index '{token}'")))?;
    if raw == 0 {
        return Err(ImportError::parse(line_no, "indices are 1-based; found 0"));
    }

    let idx = if raw > 0 { raw - 1 } else { len as i64 + raw };
    if idx < 0 || idx as usize >= len {
        return Err(ImportError::parse(
            line_no,
            format!("index {raw} out of bounds (len={len})"),
        ));
    }

    Ok(idx as usize)
}
