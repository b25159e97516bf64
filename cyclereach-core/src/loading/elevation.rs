//! Elevation surfaces used to derive segment gradients

use std::path::Path;

use geo::Coord;

use crate::Error;

/// Elevation in meters for a ground coordinate (lon, lat)
pub trait ElevationSurface: Sync {
    /// # Errors
    ///
    /// `MissingElevation` when the surface has no value at `coord`
    fn elevation_at(&self, coord: Coord<f64>) -> Result<f64, Error>;
}

impl<F> ElevationSurface for F
where
    F: Fn(Coord<f64>) -> Option<f64> + Sync,
{
    fn elevation_at(&self, coord: Coord<f64>) -> Result<f64, Error> {
        self(coord).ok_or(Error::MissingElevation {
            x: coord.x,
            y: coord.y,
        })
    }
}

/// Raster in ESRI ASCII grid format, sampled at the nearest cell
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiGrid {
    ncols: usize,
    nrows: usize,
    /// Lower left corner of the grid
    xll: f64,
    yll: f64,
    cellsize: f64,
    nodata: Option<f64>,
    /// Row-major values, first row is the northernmost
    values: Vec<f64>,
}

impl AsciiGrid {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        let mut tokens = content.split_whitespace().peekable();

        let mut ncols = None;
        let mut nrows = None;
        let mut xll = None;
        let mut yll = None;
        let mut cellsize = None;
        let mut nodata = None;
        let mut centered = (false, false);

        while let Some(key) = tokens.next_if(|t| t.chars().next().is_some_and(char::is_alphabetic)) {
            let value = tokens
                .next()
                .ok_or_else(|| header_error(&format!("missing value for '{key}'")))?;
            match key.to_ascii_lowercase().as_str() {
                "ncols" => ncols = Some(parse_count(key, value)?),
                "nrows" => nrows = Some(parse_count(key, value)?),
                "xllcorner" => xll = Some(parse_number(key, value)?),
                "yllcorner" => yll = Some(parse_number(key, value)?),
                "xllcenter" => {
                    xll = Some(parse_number(key, value)?);
                    centered.0 = true;
                }
                "yllcenter" => {
                    yll = Some(parse_number(key, value)?);
                    centered.1 = true;
                }
                "cellsize" => cellsize = Some(parse_number(key, value)?),
                "nodata_value" => nodata = Some(parse_number(key, value)?),
                other => return Err(header_error(&format!("unknown key '{other}'"))),
            }
        }

        let (Some(ncols), Some(nrows), Some(mut xll), Some(mut yll), Some(cellsize)) =
            (ncols, nrows, xll, yll, cellsize)
        else {
            return Err(header_error(
                "ncols, nrows, xll, yll and cellsize are required",
            ));
        };
        if cellsize <= 0.0 || ncols == 0 || nrows == 0 {
            return Err(header_error("grid must have a positive size"));
        }
        if centered.0 {
            xll -= cellsize / 2.0;
        }
        if centered.1 {
            yll -= cellsize / 2.0;
        }

        let values = tokens
            .map(|t| parse_number("value", t))
            .collect::<Result<Vec<f64>, Error>>()?;
        if values.len() != ncols * nrows {
            return Err(Error::DataError(format!(
                "elevation grid has {} values, expected {}",
                values.len(),
                ncols * nrows
            )));
        }

        Ok(Self {
            ncols,
            nrows,
            xll,
            yll,
            cellsize,
            nodata,
            values,
        })
    }

    fn cell(&self, coord: Coord<f64>) -> Option<usize> {
        let col = ((coord.x - self.xll) / self.cellsize).floor();
        let top = self.yll + self.nrows as f64 * self.cellsize;
        let row = ((top - coord.y) / self.cellsize).floor();

        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.ncols && row < self.nrows).then_some(row * self.ncols + col)
    }
}

impl ElevationSurface for AsciiGrid {
    fn elevation_at(&self, coord: Coord<f64>) -> Result<f64, Error> {
        self.cell(coord)
            .map(|idx| self.values[idx])
            .filter(|v| self.nodata.is_none_or(|nodata| *v != nodata))
            .ok_or(Error::MissingElevation {
                x: coord.x,
                y: coord.y,
            })
    }
}

fn header_error(message: &str) -> Error {
    Error::DataError(format!("invalid elevation grid header: {message}"))
}

fn parse_number(key: &str, value: &str) -> Result<f64, Error> {
    value
        .parse::<f64>()
        .map_err(|_| Error::DataError(format!("invalid number '{value}' for {key}")))
}

fn parse_count(key: &str, value: &str) -> Result<usize, Error> {
    value
        .parse::<usize>()
        .map_err(|_| Error::DataError(format!("invalid count '{value}' for {key}")))
}
