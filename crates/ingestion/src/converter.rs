//! Item and collection assembly.

use std::path::{Path, PathBuf};

use base64::Engine;
use chrono::{DateTime, Utc};
use netcdf_parser::{
    ExternalReferenceGenerator, InlineReferenceGenerator, InspectorOptions, NcFileInspector,
    ReferenceGenerator,
};
use renderer::Thumbnail;
use serde_json::Value;
use stac_common::{
    day_of_year, expand_date_template, expand_template, Asset, BoundingBox, ClimatologyInterval,
    Collection, CollectionExtent, Extent, Item, Link,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ConverterConfig;
use crate::context::PropertyContext;
use crate::error::Result;
use crate::layout::{expand_inputs, ItemPaths};

/// Run options, mirroring the converter's command-line flags.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub base_folder: PathBuf,
    /// Glob patterns, expanded in order
    pub input_paths: Vec<String>,
    pub collection_filename: String,
    /// Date template for the item folder, relative to `base_folder`
    pub item_subfolder: String,
    pub generate_kerchunk_assets: bool,
    /// Embed the reference file in the asset href as a data URI
    pub inline_kerchunk: bool,
    pub generate_netcdf_assets: bool,
    pub generate_thumbnail_assets: bool,
    pub overwrite_items: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            base_folder: PathBuf::from("."),
            input_paths: Vec::new(),
            collection_filename: "collection.json".to_string(),
            item_subfolder: "items".to_string(),
            generate_kerchunk_assets: false,
            inline_kerchunk: false,
            generate_netcdf_assets: true,
            generate_thumbnail_assets: false,
            overwrite_items: false,
        }
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Written(PathBuf),
    /// The item already existed and overwriting is off
    Skipped(PathBuf),
}

/// Result of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub extent: CollectionExtent,
    /// `None` when nothing was accumulated and no collection was written
    pub collection_path: Option<PathBuf>,
}

impl RunSummary {
    fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Written(path) => self.written.push(path),
            ItemOutcome::Skipped(path) => self.skipped.push(path),
        }
    }
}

const COLLECTION_MEDIA_TYPE: &str = "application/json";
const NETCDF_MEDIA_TYPE: &str = "application/netcdf";
const REFERENCE_MEDIA_TYPE: &str = "application/zstd";
const THUMBNAIL_MEDIA_TYPE: &str = "image/png";
const REFERENCE_ASSET_KEY: &str = "reference_file";
const THUMBNAIL_ASSET_KEY: &str = "thumbnail";

/// Converts NetCDF files into STAC items and keeps their collection up to date.
///
/// Items are assembled one file at a time. The collection extent is threaded
/// through [`Converter::process_item`] as a value and written once by
/// [`Converter::finalise_collection`].
pub struct Converter {
    options: ConvertOptions,
    config: ConverterConfig,
    inspector_options: InspectorOptions,
    climatology: Option<ClimatologyInterval>,
    collection: Collection,
    collection_path: PathBuf,
    seed: CollectionExtent,
    thumbnail: Option<Thumbnail>,
    references: Box<dyn ReferenceGenerator>,
}

impl Converter {
    /// Prepare a run. An existing collection file is loaded and seeds the extent.
    pub fn new(options: ConvertOptions, config: ConverterConfig) -> Result<Self> {
        let climatology = config.climatology()?;
        let collection_path = options.base_folder.join(&options.collection_filename);

        let (collection, seed) = if collection_path.is_file() {
            let collection = Collection::from_file(&collection_path)?;
            let seed = match &collection.extent {
                Some(extent) => {
                    let (bbox, start, end) = extent.overall();
                    CollectionExtent::new(bbox, start, end)
                }
                None => CollectionExtent::default(),
            };
            info!(
                path = %collection_path.display(),
                start = ?seed.start,
                end = ?seed.end,
                "Loaded existing collection"
            );
            (collection, seed)
        } else {
            let id = config
                .stac_collection_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let description = config.stac_collection_description.clone().unwrap_or_default();
            (Collection::new(id, description), CollectionExtent::default())
        };

        let thumbnail = match (&config.thumbnail, options.generate_thumbnail_assets) {
            (Some(settings), true) => Some(Thumbnail::new(settings.clone())?),
            (None, true) => {
                warn!("Thumbnails requested but the configuration has no 'thumbnail' section");
                None
            }
            _ => None,
        };

        let references: Box<dyn ReferenceGenerator> = match &config.kerchunk_command {
            Some(command) => Box::new(ExternalReferenceGenerator::from_command(command)?),
            None => Box::new(InlineReferenceGenerator),
        };

        let inspector_options = InspectorOptions {
            global_attrs: config.global_attrs.clone(),
            global_attr_map: config.global_attr_map.clone(),
        };

        Ok(Self {
            options,
            config,
            inspector_options,
            climatology,
            collection,
            collection_path,
            seed,
            thumbnail,
            references,
        })
    }

    /// The extent the run starts from.
    pub fn initial_extent(&self) -> CollectionExtent {
        self.seed.clone()
    }

    /// Convert every matching input, then rewrite the collection.
    ///
    /// The first failing file aborts the run.
    pub fn run(&self) -> Result<RunSummary> {
        std::fs::create_dir_all(&self.options.base_folder)?;

        let inputs = expand_inputs(&self.options.input_paths)?;
        if inputs.is_empty() {
            warn!(patterns = ?self.options.input_paths, "No input files matched");
        }

        let mut summary = RunSummary::default();
        let extent = inputs
            .iter()
            .try_fold(self.initial_extent(), |extent, path| -> Result<CollectionExtent> {
                let (extent, outcome) = self.process_item(path, extent)?;
                summary.record(outcome);
                Ok(extent)
            })?;

        summary.collection_path = self.finalise_collection(&extent)?;
        summary.extent = extent;

        info!(
            written = summary.written.len(),
            skipped = summary.skipped.len(),
            "Conversion complete"
        );
        Ok(summary)
    }

    /// Convert one file and return the extent widened by it.
    pub fn process_item(&self, path: &Path, extent: CollectionExtent) -> Result<(CollectionExtent, ItemOutcome)> {
        info!(path = %path.display(), "Processing item");

        let inspector = NcFileInspector::open(path, &self.config.variable, self.inspector_options.clone())?;
        let bbox = inspector.bbox()?;
        let datetime = inspector.datetime(0)?;
        let paths = ItemPaths::new(
            &self.options.base_folder,
            &self.options.item_subfolder,
            path,
            &datetime,
        )?;

        let extent = extent.include(&bbox, datetime);

        if self.should_skip(&paths) {
            info!(path = %path.display(), output = %paths.output_filepath.display(), "Skipping item, output already exists");
            return Ok((extent, ItemOutcome::Skipped(paths.output_filepath)));
        }

        std::fs::create_dir_all(&paths.dir)?;
        let item = self.build_item(path, &inspector, &paths, bbox, &datetime)?;
        std::fs::write(&paths.output_filepath, item.to_json_pretty()?)?;
        debug!(id = %item.id, output = %paths.output_filepath.display(), "Wrote item");

        Ok((extent, ItemOutcome::Written(paths.output_filepath)))
    }

    fn should_skip(&self, paths: &ItemPaths) -> bool {
        !self.options.overwrite_items
            && paths.output_filepath.exists()
            && (!self.options.generate_kerchunk_assets || paths.kerchunk_filepath.exists())
    }

    fn build_item(
        &self,
        path: &Path,
        inspector: &NcFileInspector,
        paths: &ItemPaths,
        bbox: BoundingBox,
        datetime: &DateTime<Utc>,
    ) -> Result<Item> {
        let item_id = Uuid::new_v4().to_string();

        let mut props = self.config.defaults.item.clone();
        props.extend(inspector.properties());
        props.insert(
            self.config.dset_id_name.clone(),
            Value::String(self.config.dataset_id.clone()),
        );

        let fpath = path.to_string_lossy();
        let context = PropertyContext {
            item_id: &item_id,
            dataset_id: &self.config.dataset_id,
            var_id: &self.config.variable,
            fpath: &fpath,
            paths,
            datetime,
        };
        for (prop, template) in &self.config.templated_properties {
            props.insert(prop.clone(), Value::String(expand_template(template, &context)?));
        }

        if self.climatology.is_some() {
            props.insert("day_of_year".to_string(), Value::from(day_of_year(datetime)));
        }

        let mut item = Item::new(item_id, bbox, props);
        item.collection = Some(self.collection.id.clone());
        item.set_datetime(datetime);
        if let Some(interval) = &self.climatology {
            item.set_interval(&interval.start, &interval.end);
        }

        item.add_link(
            Link::new(paths.collection_href(&self.options.collection_filename), "collection")
                .with_type(COLLECTION_MEDIA_TYPE),
        );

        if self.options.generate_kerchunk_assets {
            let asset = self.reference_asset(path, paths, datetime)?;
            item.add_asset(REFERENCE_ASSET_KEY, asset);
        }

        if self.options.generate_netcdf_assets {
            let asset = Asset::new(self.netcdf_href(paths, datetime)?, NETCDF_MEDIA_TYPE, &["data"])
                .with_extra_fields(&self.config.defaults.netcdf_asset);
            item.add_asset(paths.stem.clone(), asset);
        }

        if let Some(thumbnail) = &self.thumbnail {
            thumbnail.generate(inspector, &paths.thumbnail_filepath)?;
            debug!(output = %paths.thumbnail_filepath.display(), "Wrote thumbnail");

            let href = format!(
                "{}{}",
                expand_date_template(self.config.thumbnail_url()?, datetime)?,
                paths.thumbnail_filename
            );
            let mut asset = Asset::new(href, THUMBNAIL_MEDIA_TYPE, &["thumbnail"]);
            if let Some(defaults) = &self.config.defaults.thumbnail_asset {
                asset = asset.with_extra_fields(defaults);
            }
            item.add_asset(THUMBNAIL_ASSET_KEY, asset);
        }

        Ok(item)
    }

    fn netcdf_href(&self, paths: &ItemPaths, datetime: &DateTime<Utc>) -> Result<String> {
        Ok(format!(
            "{}{}",
            expand_date_template(self.config.netcdf_url()?, datetime)?,
            paths.input_filename
        ))
    }

    /// Generate the reference file beside the item and describe it as an asset.
    fn reference_asset(&self, path: &Path, paths: &ItemPaths, datetime: &DateTime<Utc>) -> Result<Asset> {
        let netcdf_href = self.netcdf_href(paths, datetime)?;
        self.references
            .generate(path, &netcdf_href, &paths.kerchunk_filepath)?;

        let href = if self.options.inline_kerchunk {
            let content = std::fs::read(&paths.kerchunk_filepath)?;
            format!(
                "data:application/json;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(content)
            )
        } else {
            format!(
                "{}{}",
                expand_date_template(self.config.kerchunk_url()?, datetime)?,
                paths.kerchunk_filename
            )
        };

        Ok(Asset::new(href, REFERENCE_MEDIA_TYPE, &["reference", "data"])
            .with_extra_fields(&self.config.defaults.kerchunk_asset))
    }

    /// Write the collection with the final extent.
    ///
    /// With a climatology interval the temporal extent is that interval.
    /// Returns `None`, writing nothing, when the extent is empty. An
    /// unchanged collection file is left alone.
    pub fn finalise_collection(&self, extent: &CollectionExtent) -> Result<Option<PathBuf>> {
        let Some(bbox) = extent.bbox else {
            warn!(path = %self.collection_path.display(), "No items contributed an extent, collection not written");
            return Ok(None);
        };

        let (start, end) = match &self.climatology {
            Some(interval) => (Some(interval.start), Some(interval.end)),
            None => (extent.start, extent.end),
        };

        let mut collection = self.collection.clone();
        collection.extent = Some(Extent::new(bbox, start, end));
        collection.links.retain(|link| link.rel != "self");
        let json = collection.to_json_pretty()?;

        let unchanged = std::fs::read_to_string(&self.collection_path)
            .map(|existing| existing == json)
            .unwrap_or(false);
        if unchanged {
            debug!(path = %self.collection_path.display(), "Collection unchanged");
        } else {
            std::fs::write(&self.collection_path, json)?;
            info!(path = %self.collection_path.display(), "Wrote collection");
        }

        Ok(Some(self.collection_path.clone()))
    }
}
