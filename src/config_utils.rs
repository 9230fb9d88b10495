use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::path::PathBuf;

use xml::attribute::OwnedAttribute;
use xml::reader::EventReader;

use super::errors::{PlanError, PlanResult};


pub fn xml_parser_from_path(path: &Path) -> PlanResult<EventReader<BufReader<File>>> {
    let file = File::open(path).map_err(|err| PlanError::io(path, err))?;
    let file = BufReader::new(file);
    Ok(EventReader::new(file))
}

pub fn get_xml_attribute_value(attributes: &[OwnedAttribute], attr_name: &str)
                               -> Option<String> {
    attributes.iter().find(|attr| attr.name.local_name == attr_name)
                     .map(|attr| attr.value.clone())
}

pub fn str_to_absolute_path(path_str: &str, default_base_dir: &Path) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        return path;
    } else {
        return [default_base_dir, Path::new(&path)].iter().collect();
    }
}

/// Reads a whitespace-separated text file, handing each line's fields to `parse`.  Blank lines
/// are skipped, and lines may have any number of fields.
pub fn read_rows<T, F>(path: &Path, parse: F) -> PlanResult<Vec<T>>
    where F: Fn(&[&str]) -> Result<T, String>
{
    let file = File::open(path).map_err(|err| PlanError::io(path, err))?;
    let reader = BufReader::new(file);
    let mut records = vec![];
    for (ii, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| PlanError::io(path, err))?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        records.push(parse(&fields).map_err(|message| PlanError::Parse {
            path: path.to_path_buf(),
            line: ii + 1,
            message,
        })?);
    }
    Ok(records)
}

/// Like `read_rows`, but every line must have exactly `num_fields` fields.
pub fn read_records<T, F>(path: &Path, num_fields: usize, parse: F) -> PlanResult<Vec<T>>
    where F: Fn(&[&str]) -> Result<T, String>
{
    read_rows(path, |fields| {
        if fields.len() != num_fields {
            return Err(format!("expected {} fields, found {}", num_fields, fields.len()));
        }
        parse(fields)
    })
}

/// Parses one field, describing the field by `what` if that fails.
pub fn parse_field<T>(field: &str, what: &str) -> Result<T, String>
    where T: std::str::FromStr, T::Err: std::fmt::Display
{
    field.parse().map_err(|err| format!("bad {} {:?}: {}", what, field, err))
}
