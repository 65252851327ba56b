//! Fields that templated properties may reference.

use chrono::{DateTime, Datelike, Utc};
use stac_common::stac::format_datetime;
use stac_common::{TemplateFields, TemplateValue};

use crate::layout::ItemPaths;

/// Everything a `templated_properties` entry can name, and nothing else.
///
/// | field | value |
/// |---|---|
/// | `item_id` | the item's UUID |
/// | `dset_id`, `dataset_id` | configured dataset id |
/// | `var_id` | configured variable |
/// | `fpath` | input path as given |
/// | `input_filename`, `output_filename`, `kerchunk_filename` | bare file names |
/// | `output_filepath`, `kerchunk_filepath` | full output paths |
/// | `item_subfolder` | expanded subfolder |
/// | `year`, `month`, `day` | item date parts |
/// | `datetime` | item instant, RFC 3339 |
pub struct PropertyContext<'a> {
    pub item_id: &'a str,
    pub dataset_id: &'a str,
    pub var_id: &'a str,
    pub fpath: &'a str,
    pub paths: &'a ItemPaths,
    pub datetime: &'a DateTime<Utc>,
}

impl TemplateFields for PropertyContext<'_> {
    fn field(&self, name: &str) -> Option<TemplateValue> {
        let value: TemplateValue = match name {
            "item_id" => self.item_id.into(),
            "dset_id" | "dataset_id" => self.dataset_id.into(),
            "var_id" => self.var_id.into(),
            "fpath" => self.fpath.into(),
            "input_filename" => self.paths.input_filename.as_str().into(),
            "output_filename" => self.paths.output_filename.as_str().into(),
            "output_filepath" => self.paths.output_filepath.to_string_lossy().into_owned().into(),
            "kerchunk_filename" => self.paths.kerchunk_filename.as_str().into(),
            "kerchunk_filepath" => self.paths.kerchunk_filepath.to_string_lossy().into_owned().into(),
            "item_subfolder" => self.paths.subfolder.as_str().into(),
            "year" => self.datetime.year().into(),
            "month" => self.datetime.month().into(),
            "day" => self.datetime.day().into(),
            "datetime" => format_datetime(self.datetime).into(),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stac_common::{expand_template, StacError};
    use std::path::Path;

    #[test]
    fn test_context_fields() {
        let dt = Utc.with_ymd_and_hms(2022, 1, 2, 0, 0, 0).unwrap();
        let paths = ItemPaths::new(Path::new("out"), "items/{year}", Path::new("in/sst_0102.nc"), &dt).unwrap();
        let ctx = PropertyContext {
            item_id: "1234",
            dataset_id: "sst-cdr",
            var_id: "sst",
            fpath: "in/sst_0102.nc",
            paths: &paths,
            datetime: &dt,
        };

        assert_eq!(
            expand_template("{dset_id}/{var_id}/{input_filename}", &ctx).unwrap(),
            "sst-cdr/sst/sst_0102.nc"
        );
        assert_eq!(
            expand_template("{year}-{month:02d}-{day:02d} {item_subfolder}", &ctx).unwrap(),
            "2022-01-02 items/2022"
        );
        assert_eq!(expand_template("{datetime}", &ctx).unwrap(), "2022-01-02T00:00:00Z");

        // Only enumerated fields resolve
        assert!(matches!(
            expand_template("{self}", &ctx),
            Err(StacError::UnknownTemplateField { .. })
        ));
    }
}
