//! Shapefile record source.
//!
//! Pairs every shape in `<name>.shp` with its attribute row from the sibling
//! `<name>.dbf`. Decoding is left to the `shapefile` crate; this module only
//! keeps the column order of the attribute table and turns dBase values into
//! JSON.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value};
use shapefile::dbase::{self, FieldValue};
use shapefile::Shape;
use tracing::{debug, info};

use crate::error::{BoundaryError, Result};

/// One decoded record: the raw shape and its attributes in column order.
pub struct ShapeRecord {
    pub shape: Shape,
    pub properties: Map<String, Value>,
}

// `Shape` implements neither `Debug` nor `Clone`
impl fmt::Debug for ShapeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRecord")
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

/// A shapefile on disk together with its attribute schema.
#[derive(Debug, Clone)]
pub struct ShapefileSource {
    shp_path: PathBuf,
    dbf_path: PathBuf,
    fields: Vec<String>,
}

impl ShapefileSource {
    /// Open a shapefile and read its attribute schema.
    pub fn open(path: &Path) -> Result<Self> {
        let shp_path = path.to_path_buf();
        let dbf_path = path.with_extension("dbf");

        let table = open_table(&dbf_path)?;
        let fields: Vec<String> = table
            .fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect();

        info!(
            path = %shp_path.display(),
            columns = fields.len(),
            "Opened shapefile"
        );
        debug!(fields = ?fields, "Attribute schema");

        Ok(Self {
            shp_path,
            dbf_path,
            fields,
        })
    }

    pub fn path(&self) -> &Path {
        &self.shp_path
    }

    /// Column names in table order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// Stream every record through `consume`.
    ///
    /// Records are decoded lazily as `consume` pulls them; the readers are
    /// closed when it returns.
    pub fn scan<R, F>(&self, consume: F) -> Result<R>
    where
        F: FnOnce(&mut dyn Iterator<Item = Result<ShapeRecord>>) -> Result<R>,
    {
        let shapes = shapefile::ShapeReader::from_path(&self.shp_path).map_err(|e| {
            BoundaryError::Open {
                path: self.shp_path.clone(),
                message: e.to_string(),
            }
        })?;
        let table = open_table(&self.dbf_path)?;
        let mut reader = shapefile::Reader::new(shapes, table);

        let fields = &self.fields;
        let mut records = reader
            .iter_shapes_and_records()
            .enumerate()
            .map(|(index, item)| match item {
                Ok((shape, mut record)) => {
                    let properties = fields
                        .iter()
                        .map(|name| {
                            let value = record.remove(name).map_or(Value::Null, field_to_json);
                            (name.clone(), value)
                        })
                        .collect();
                    Ok(ShapeRecord { shape, properties })
                }
                Err(e) => Err(BoundaryError::Read {
                    index,
                    message: e.to_string(),
                }),
            });

        consume(&mut records)
    }
}

fn open_table(path: &Path) -> Result<dbase::Reader<std::io::BufReader<std::fs::File>>> {
    dbase::Reader::from_path(path).map_err(|e| BoundaryError::AttributeTable {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Convert one dBase value to JSON.
///
/// Empty cells become `null`; numerics without a fractional part become
/// integers so codes such as `68000` do not turn into `68000.0`.
pub fn field_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Character(text) => text.map_or(Value::Null, Value::String),
        FieldValue::Memo(text) => Value::String(text),
        FieldValue::Numeric(number) => number.map_or(Value::Null, number_to_json),
        FieldValue::Float(number) => number.map_or(Value::Null, |n| number_to_json(n as f64)),
        FieldValue::Double(number) => number_to_json(number),
        FieldValue::Currency(number) => number_to_json(number),
        FieldValue::Integer(number) => Value::from(number),
        FieldValue::Logical(flag) => flag.map_or(Value::Null, Value::Bool),
        FieldValue::Date(date) => date.map_or(Value::Null, |d| {
            Value::String(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()))
        }),
        other => Value::String(format!("{other:?}")),
    }
}

fn number_to_json(number: f64) -> Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if number.fract() == 0.0 && number.abs() < MAX_EXACT {
        Value::from(number as i64)
    } else {
        Number::from_f64(number).map_or(Value::Null, Value::Number)
    }
}
