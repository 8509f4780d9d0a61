//! Dataset writers: CSV, ARFF and JSON, plus the release table.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::OutputFormat;
use crate::core::{Diagnostics, Release, Result};
use crate::history::{Dataset, FileInstance};

/// Column names, in output order.
pub const COLUMNS: [&str; 16] = [
    "Version",
    "Filename",
    "Size",
    "LocTouched",
    "LocAdded",
    "MaxLocAdded",
    "AvgLocAdded",
    "NumberOfRevisions",
    "NumberOfAuthors",
    "Churn",
    "MaxChurn",
    "AvgChurn",
    "NumberOfFixedBugs",
    "Age",
    "WeightedAge",
    "Buggy",
];

/// One dataset row as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatasetRow<'a> {
    pub version: &'a str,
    pub filename: &'a str,
    pub size: u64,
    pub loc_touched: u64,
    pub loc_added: u64,
    pub max_loc_added: u64,
    pub avg_loc_added: f64,
    pub number_of_revisions: u32,
    pub number_of_authors: usize,
    pub churn: i64,
    pub max_churn: i64,
    pub avg_churn: f64,
    pub number_of_fixed_bugs: usize,
    pub age: u64,
    pub weighted_age: f64,
    pub buggy: &'static str,
}

impl<'a> From<&'a FileInstance> for DatasetRow<'a> {
    fn from(i: &'a FileInstance) -> Self {
        Self {
            version: &i.release,
            filename: &i.filename,
            size: i.size,
            loc_touched: i.loc_touched,
            loc_added: i.loc_added,
            max_loc_added: i.max_loc_added,
            avg_loc_added: i.avg_loc_added,
            number_of_revisions: i.revisions,
            number_of_authors: i.number_of_authors(),
            churn: i.churn,
            max_churn: i.max_churn,
            avg_churn: i.avg_churn,
            number_of_fixed_bugs: i.number_of_fixed_bugs(),
            age: i.age,
            weighted_age: i.weighted_age(),
            buggy: if i.buggy { "yes" } else { "no" },
        }
    }
}

impl DatasetRow<'_> {
    /// Numeric features and the class label, without version and filename.
    fn features(&self) -> [String; 14] {
        [
            self.size.to_string(),
            self.loc_touched.to_string(),
            self.loc_added.to_string(),
            self.max_loc_added.to_string(),
            decimal(self.avg_loc_added),
            self.number_of_revisions.to_string(),
            self.number_of_authors.to_string(),
            self.churn.to_string(),
            self.max_churn.to_string(),
            decimal(self.avg_churn),
            self.number_of_fixed_bugs.to_string(),
            self.age.to_string(),
            decimal(self.weighted_age),
            self.buggy.to_string(),
        ]
    }
}

fn decimal(value: f64) -> String {
    format!("{value:.2}")
}

/// Quote a CSV field when it holds a separator, quote or line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_line<W: Write, S: AsRef<str>>(writer: &mut W, fields: &[S]) -> Result<()> {
    let line: Vec<String> = fields.iter().map(|f| csv_field(f.as_ref())).collect();
    writeln!(writer, "{}", line.join(","))?;
    Ok(())
}

pub fn write_csv<'a, W: Write>(
    rows: impl IntoIterator<Item = &'a FileInstance>,
    writer: &mut W,
) -> Result<()> {
    csv_line(writer, &COLUMNS)?;
    for instance in rows {
        let row = DatasetRow::from(instance);
        let mut fields = vec![row.version.to_string(), row.filename.to_string()];
        fields.extend(row.features());
        csv_line(writer, &fields)?;
    }
    Ok(())
}

/// ARFF relation with numeric attributes and a `{no,yes}` class.
pub fn write_arff<'a, W: Write>(
    relation: &str,
    rows: impl IntoIterator<Item = &'a FileInstance>,
    writer: &mut W,
) -> Result<()> {
    writeln!(writer, "@relation {}", relation.replace(char::is_whitespace, "_"))?;
    writeln!(writer)?;
    let class = COLUMNS[COLUMNS.len() - 1];
    for name in &COLUMNS[2..COLUMNS.len() - 1] {
        writeln!(writer, "@attribute {name} numeric")?;
    }
    writeln!(writer, "@attribute {class} {{no,yes}}")?;
    writeln!(writer)?;
    writeln!(writer, "@data")?;
    for instance in rows {
        writeln!(writer, "{}", DatasetRow::from(instance).features().join(","))?;
    }
    Ok(())
}

pub fn write_json<'a, W: Write>(
    rows: impl IntoIterator<Item = &'a FileInstance>,
    writer: &mut W,
) -> Result<()> {
    let rows: Vec<DatasetRow<'_>> = rows.into_iter().map(DatasetRow::from).collect();
    serde_json::to_writer_pretty(&mut *writer, &rows)?;
    writeln!(writer)?;
    Ok(())
}

/// Write rows in `format`; `relation` names the ARFF relation.
pub fn write_rows<'a, W: Write>(
    format: OutputFormat,
    relation: &str,
    rows: impl IntoIterator<Item = &'a FileInstance>,
    writer: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(rows, writer),
        OutputFormat::Arff => write_arff(relation, rows, writer),
        OutputFormat::Json => write_json(rows, writer),
    }
}

/// `Index, Version, Release Date`, oldest first.
pub fn write_release_table<W: Write>(
    format: OutputFormat,
    releases: &[Release],
    writer: &mut W,
) -> Result<()> {
    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *writer, releases)?;
        writeln!(writer)?;
        return Ok(());
    }
    csv_line(writer, &["Index", "Version", "Release Date"])?;
    for (i, release) in releases.iter().enumerate() {
        csv_line(
            writer,
            &[(i + 1).to_string(), release.id.clone(), release.date.to_string()],
        )?;
    }
    Ok(())
}

/// Human-readable run summary.
pub fn write_summary<W: Write>(dataset: &Dataset, writer: &mut W) -> Result<()> {
    let d: &Diagnostics = &dataset.diagnostics;
    writeln!(writer, "releases:              {}", dataset.releases.len())?;
    writeln!(writer, "horizon releases:      {}", dataset.horizon.len())?;
    writeln!(writer, "instances:             {}", dataset.instances.len())?;
    writeln!(writer, "buggy instances:       {}", dataset.buggy_count())?;
    writeln!(writer, "defects fetched:       {}", d.defects_fetched)?;
    writeln!(writer, "defects kept:          {}", d.defects_kept)?;
    writeln!(writer, "defects dropped:       {}", d.defects_dropped())?;
    writeln!(writer, "malformed tickets:     {}", d.defects_malformed)?;
    writeln!(writer, "invalid affected sets: {}", d.invalid_affected_versions)?;
    writeln!(writer, "proportion estimated:  {}", d.proportion_estimated)?;
    writeln!(writer, "proportion:            {:.3}", d.proportion)?;
    writeln!(writer, "commits after release: {}", d.commits_without_release)?;
    writeln!(writer, "events applied:        {}", d.events_applied)?;
    writeln!(writer, "events ignored:        {}", d.events_ignored)?;
    writeln!(writer, "name collisions:       {}", d.name_collisions)?;
    writeln!(writer, "duplicate instances:   {}", d.duplicate_instances)?;
    Ok(())
}

/// Where and how [`write_dataset`] writes.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub dir: PathBuf,
    pub format: OutputFormat,
    pub full_history: bool,
    pub write_snapshots: bool,
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

/// Write the dataset, the release table and (optionally) one file per
/// snapshot into `options.dir`. Returns the written paths.
pub fn write_dataset(dataset: &Dataset, project: &str, options: &OutputOptions) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&options.dir)?;
    let ext = options.format.extension();
    let mut written = Vec::new();

    let path = options.dir.join(format!("{project}_dataset.{ext}"));
    let mut out = create(&path)?;
    write_rows(options.format, project, dataset.rows(options.full_history), &mut out)?;
    out.flush()?;
    written.push(path);

    let release_ext = if options.format == OutputFormat::Json { "json" } else { "csv" };
    let path = options.dir.join(format!("{project}_releases.{release_ext}"));
    let mut out = create(&path)?;
    write_release_table(options.format, &dataset.releases, &mut out)?;
    out.flush()?;
    written.push(path);

    if options.write_snapshots {
        for snapshot in &dataset.snapshots {
            let name = format!("{project}_{}_snapshot.{ext}", snapshot.release);
            let path = options.dir.join(name.replace(['/', '\\'], "_"));
            let mut out = create(&path)?;
            let relation = format!("{project}_{}", snapshot.release);
            write_rows(options.format, &relation, &snapshot.instances, &mut out)?;
            out.flush()?;
            written.push(path);
        }
    }

    tracing::info!(files = written.len(), dir = %options.dir.display(), "dataset written");
    Ok(written)
}
