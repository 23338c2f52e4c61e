use std::io::Write;

use crate::{
    datatypes::{Limiter, TriangleMesh},
    error::ViewerError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Whitespace,
    Comma,
}

impl Delimiter {
    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Whitespace => line.split_whitespace().collect(),
            Delimiter::Comma => line.split(',').map(|f| f.trim()).collect(),
        }
    }
}

/// Reads every number in a delimited text file, in row-major order
///
/// # Arguments
/// * `path` - The path to the input file
/// * `delimiter` - How fields on a line are separated
///
/// # Returns
/// A flat vector with the values of every row, concatenated
pub fn read_values(path: &str, delimiter: Delimiter) -> Result<Vec<f64>, ViewerError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(err) => {
            return Err(ViewerError::Input(format!(
                "Unable to open {}: {err}",
                path
            )))
        }
    };

    parse_values(&contents, delimiter, path)
}

/// Parses delimited text. `source` only labels error messages.
pub fn parse_values(
    contents: &str,
    delimiter: Delimiter,
    source: &str,
) -> Result<Vec<f64>, ViewerError> {
    let mut values: Vec<f64> = Vec::new();
    let mut row_width: Option<(usize, usize)> = None; // (width, first line)

    for (line_idx, raw_line) in contents.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = match raw_line.find('#') {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        };
        if line.trim().is_empty() {
            continue;
        }

        let fields = delimiter.split(line);

        match row_width {
            None => row_width = Some((fields.len(), line_no)),
            Some((width, first_line)) if width != fields.len() => {
                return Err(ViewerError::Shape(format!(
                    "{source} line {line_no} has {} columns but line {first_line} has {width}",
                    fields.len()
                )));
            }
            Some(_) => {}
        }

        for field in fields {
            let value: f64 = match field.parse() {
                Ok(v) => v,
                Err(_) => {
                    return Err(ViewerError::Parse(format!(
                        "{source} line {line_no}: non-float value {:?}",
                        field
                    )))
                }
            };
            values.push(value);
        }
    }

    Ok(values)
}

/// Loads the limiter polyline: R values followed by Z values
pub fn load_limiter(path: &str) -> Result<Limiter, ViewerError> {
    let values = read_values(path, Delimiter::Whitespace)?;
    let num_values = values.len();
    let limiter = Limiter::from_flat(values)?;

    println!(
        "info: loaded {} limiter values from {} as {} (R,Z) pairs",
        num_values,
        path,
        limiter.len()
    );

    Ok(limiter)
}

/// Loads a comma delimited triangle file
pub fn load_triangles(path: &str) -> Result<TriangleMesh, ViewerError> {
    let mesh = TriangleMesh::from_flat(read_values(path, Delimiter::Comma)?)?;

    if mesh.is_empty() {
        println!("warning [mesh]: {} contains no triangles", path);
    } else {
        println!("info: loaded {} triangles from {}", mesh.len(), path);
    }

    Ok(mesh)
}

/// Loads the search results; each value is a vertex-slot reference
pub fn load_search(path: &str) -> Result<Vec<f64>, ViewerError> {
    let values = read_values(path, Delimiter::Whitespace)?;
    println!("info: loaded {} search entries from {}", values.len(), path);
    Ok(values)
}

/// Reads a file written by [`write_flat_pairs`] back into a limiter
pub fn load_flat_pairs(path: &str) -> Result<Limiter, ViewerError> {
    Limiter::from_pairs(read_values(path, Delimiter::Comma)?)
}

fn create_output(path: &str) -> Result<std::fs::File, ViewerError> {
    match std::fs::File::create(path) {
        Ok(f) => Ok(f),
        Err(err) => Err(ViewerError::Output(format!(
            "Failed to create {path}: {err}"
        ))),
    }
}

fn write_error(path: &str, err: std::io::Error) -> ViewerError {
    ViewerError::Output(format!("Failed to write {path}: {err}"))
}

/// Writes the limiter as comma delimited `r,z` rows
///
/// # Arguments
/// * `limiter` - The limiter to dump
/// * `path` - The output file
pub fn write_flat_pairs(limiter: &Limiter, path: &str) -> Result<(), ViewerError> {
    let mut file = create_output(path)?;

    for row in limiter.pairs.row_iter() {
        writeln!(file, "{},{}", row[0], row[1]).map_err(|err| write_error(path, err))?;
    }

    println!("info: wrote {} (R,Z) pairs to {}", limiter.len(), path);

    Ok(())
}

/// Writes a mesh one `x, y` vertex per line, three lines per triangle
pub fn write_triangles(mesh: &TriangleMesh, path: &str) -> Result<(), ViewerError> {
    let mut file = create_output(path)?;

    for triangle in mesh.iter() {
        for vertex in triangle.vertices() {
            writeln!(file, "{}, {}", vertex.x, vertex.y).map_err(|err| write_error(path, err))?;
        }
    }

    println!("info: wrote {} triangles to {}", mesh.len(), path);

    Ok(())
}
