//! Create and manipulate the row-based [Table].

#[cfg(test)]
mod tests;

use crate::Error;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A row-based table of generic data.
///
/// # Examples
///
/// ```
/// use ribotools::Table;
///
/// let mut table = Table::new();
/// table.headers = vec!["gene_id", "strand"];
/// table.add_row(vec!["ENSG01", "+"]).unwrap();
///
/// assert_eq!(table.get_column("strand").unwrap(), vec![&"+"]);
/// ```
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Table<T> {
    /// Names of the table columns.
    pub headers: Vec<T>,
    /// Rows of table values.
    pub rows: Vec<Vec<T>>,
    /// Optional file path for where the table was read from.
    pub path: Option<PathBuf>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T> {
    /// Create a new table with empty headers and rows.
    pub fn new() -> Self {
        Table { headers: Vec::new(), rows: Vec::new(), path: None }
    }

    /// Number of rows (excluding headers).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Methods for when the table data can be viewed as strings.
impl<T> Table<T>
where
    T: AsRef<str>,
{
    /// Add a new row to the table.
    ///
    /// The row must have one value per header.
    pub fn add_row(&mut self, row: Vec<T>) -> Result<(), Report> {
        let (new, ex) = (row.len(), self.headers.len());
        if new != ex {
            return Err(eyre!("New row size ({new}) does not match table headers ({ex})."));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Add a new column to the table.
    ///
    /// # Arguments
    ///
    /// * `header` - Name of the new column.
    /// * `column` - One value per existing row.
    pub fn add_column(&mut self, header: T, column: Vec<T>) -> Result<(), Report> {
        let (new, ex) = (column.len(), self.rows.len());
        if ex != new {
            return Err(eyre!("New column size ({new}) does not match existing table ({ex})."));
        }

        self.headers.push(header);
        self.rows.iter_mut().zip(column).for_each(|(row, val)| row.push(val));
        Ok(())
    }

    /// Get the column index (0-based) corresponding to the header.
    ///
    /// Fails with [`Error::MissingColumn`] if the header is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use ribotools::Table;
    ///
    /// let mut table = Table::new();
    /// table.headers = vec!["1", "2", "3"];
    ///
    /// assert_eq!(table.get_header_index("3").unwrap(), 2);
    /// assert!(table.get_header_index("4").is_err());
    /// ```
    pub fn get_header_index(&self, header: &str) -> Result<usize, Report> {
        self.headers.iter().position(|h| h.as_ref() == header).ok_or_else(|| {
            Error::MissingColumn { column: header.to_string(), path: self.path.clone() }.into()
        })
    }

    /// Check that every one of `headers` is present in the table.
    pub fn require_columns(&self, headers: &[&str]) -> Result<(), Report> {
        headers.iter().try_for_each(|h| self.get_header_index(h).map(|_| ()))
    }

    /// Return a vector of table values in a column.
    pub fn get_column(&self, header: &str) -> Result<Vec<&T>, Report> {
        let header_i = self.get_header_index(header)?;
        Ok(self.rows.iter().map(|row| &row[header_i]).collect())
    }

    /// Serialize the table as delimited text, headers first.
    ///
    /// Fields containing the delimiter or quotes are quoted.
    pub fn to_delimited(&self, delim: char) -> Result<String, Report> {
        let delim = u8::try_from(delim).wrap_err_with(|| format!("Delimiter {delim:?} is not ASCII."))?;
        let mut writer = csv::WriterBuilder::new().delimiter(delim).from_writer(Vec::new());

        if !self.headers.is_empty() {
            writer
                .write_record(self.headers.iter().map(|h| h.as_ref()))
                .wrap_err("Unable to write table headers.")?;
        }
        for (i, row) in self.rows.iter().enumerate() {
            writer
                .write_record(row.iter().map(|v| v.as_ref()))
                .wrap_err_with(|| format!("Unable to write table row {i}."))?;
        }

        let bytes = writer.into_inner().wrap_err("Unable to flush table.")?;
        String::from_utf8(bytes).wrap_err("Table is not valid UTF-8.")
    }
}

/// Methods for when the table data can be viewed as strings and cloned.
impl<T> Table<T>
where
    T: AsRef<str> + Clone,
{
    /// Project the table onto a subset of columns, in the order given.
    ///
    /// # Examples
    ///
    /// ```
    /// use ribotools::Table;
    ///
    /// let mut table = Table::new();
    /// table.headers = vec!["1", "2", "3"];
    /// table.add_row(vec!["A", "B", "C"]).unwrap();
    ///
    /// let selected = table.select(&["3", "1"]).unwrap();
    /// assert_eq!(selected.rows, vec![vec!["C", "A"]]);
    /// ```
    pub fn select(&self, headers: &[&str]) -> Result<Table<T>, Report> {
        let indices: Vec<usize> =
            headers.iter().map(|h| self.get_header_index(h)).collect::<Result<_, _>>()?;

        let mut table = Table::new();
        table.path = self.path.clone();
        table.headers = indices.iter().map(|i| self.headers[*i].clone()).collect();
        table.rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|i| row[*i].clone()).collect())
            .collect();
        Ok(table)
    }

    /// Keep only rows whose value in `header` equals `pattern` exactly.
    pub fn filter(&self, header: &str, pattern: &str) -> Result<Table<T>, Report> {
        let header_i = self.get_header_index(header)?;
        let mut table = Table::new();
        table.path = self.path.clone();
        table.headers = self.headers.clone();
        table.rows =
            self.rows.iter().filter(|row| row[header_i].as_ref() == pattern).cloned().collect_vec();
        Ok(table)
    }
}

impl Table<String> {
    /// Read a TSV or CSV file into a Table.
    ///
    /// The first line is used as headers. An empty file returns an empty
    /// table. Fails with [`Error::InputNotFound`] if the path does not exist.
    ///
    /// # Arguments
    ///
    /// * `path` - File path.
    /// * `delim` - Field delimiter, `'\t'` for TSV or `','` for CSV.
    ///
    /// # Examples
    ///
    /// ```
    /// use ribotools::Table;
    /// use std::io::Write;
    /// use tempfile::NamedTempFile;
    ///
    /// let mut file = NamedTempFile::new().unwrap();
    /// writeln!(file, "1\t2\t3\nA\tB\tC").unwrap();
    /// let table = Table::read(file.path(), '\t').unwrap();
    /// assert_eq!(table.rows, vec![vec!["A", "B", "C"]]);
    /// ```
    pub fn read(path: &Path, delim: char) -> Result<Table<String>, Report> {
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()).into());
        }

        let delim = u8::try_from(delim).wrap_err_with(|| format!("Delimiter {delim:?} is not ASCII."))?;

        let file = File::open(path).wrap_err_with(|| eyre!("Failed to read file: {path:?}"))?;
        let mut reader =
            csv::ReaderBuilder::new().delimiter(delim).has_headers(false).from_reader(file);

        let mut table = Table::new();
        for (i, record) in reader.records().enumerate() {
            let record =
                record.wrap_err_with(|| format!("Failed to parse line {} of {path:?}", i + 1))?;
            let row = record.iter().map(String::from).collect_vec();
            // if headers are empty, this is the first line, write headers
            if table.headers.is_empty() {
                table.headers = row;
            } else {
                table.rows.push(row);
            }
        }

        table.path = Some(path.to_path_buf());

        Ok(table)
    }
}

/// Create `path` and write `text` to it in one go.
pub fn write_text(path: &Path, text: &str) -> Result<(), Report> {
    let mut file =
        File::create(path).wrap_err_with(|| format!("Unable to create file: {path:?}"))?;
    file.write_all(text.as_bytes()).wrap_err_with(|| format!("Unable to write file: {path:?}"))?;
    Ok(())
}
