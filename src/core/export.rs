//! Printable renderings of a run.
//!
//! These are for eyeballing and for handing labels to presentation software;
//! the experiment's own file format stays outside this crate.

use std::io::{self, Write};

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::block::Block;
#[cfg(feature = "serde")]
use crate::config::SequenceConfig;
use crate::orchestrator::Run;

/// Output layout for [`write_run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One bracketed list per block: `[0, 2, 1, 2, ...]`.
    #[default]
    List,
    /// `block,position,category` rows with a header, one row per presentation.
    Column,
    /// The whole run, seeds included, as pretty-printed JSON.
    #[cfg(feature = "serde")]
    Json,
}

impl Format {
    pub fn parse(s: &str) -> Option<Format> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Some(Format::List),
            "column" | "csv" => Some(Format::Column),
            #[cfg(feature = "serde")]
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

pub fn write_run<W: Write>(w: &mut W, run: &Run, format: Format) -> io::Result<()> {
    match format {
        Format::List => {
            for rec in &run.blocks {
                writeln!(w, "{}", rec.block)?;
            }
        }
        Format::Column => {
            writeln!(w, "block,position,category")?;
            for rec in &run.blocks {
                write_column(w, rec.index, &rec.block)?;
            }
        }
        #[cfg(feature = "serde")]
        Format::Json => {
            serde_json::to_writer_pretty(&mut *w, run)?;
            writeln!(w)?;
        }
    }
    Ok(())
}

fn write_column<W: Write>(w: &mut W, index: usize, block: &Block) -> io::Result<()> {
    for (position, c) in block.iter().enumerate() {
        writeln!(w, "{index},{position},{c}")?;
    }
    Ok(())
}

/// Blocks read back from JSON, plus the configuration when the input carried one.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imported {
    pub sequence: Option<SequenceConfig>,
    pub blocks: Vec<Block>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportShape {
    Run(Run),
    Bare(Vec<Block>),
}

/// Parse either a JSON run (as written by [`Format::Json`]) or a bare array of
/// label arrays.
#[cfg(feature = "serde")]
pub fn import_blocks(json: &str) -> Result<Imported, serde_json::Error> {
    Ok(match serde_json::from_str(json)? {
        ImportShape::Run(run) => Imported {
            sequence: Some(run.config.sequence),
            blocks: run.into_blocks(),
        },
        ImportShape::Bare(blocks) => Imported {
            sequence: None,
            blocks,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RunConfig, SequenceConfig};
    use crate::orchestrator::Orchestrator;

    fn small_run() -> Run {
        Orchestrator::new(RunConfig::new(SequenceConfig::new(1, 2), 2).with_seed(6))
            .unwrap()
            .run()
            .unwrap()
    }

    fn render(run: &Run, format: Format) -> String {
        let mut out = Vec::new();
        write_run(&mut out, run, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn list_prints_one_line_per_block() {
        let run = small_run();
        let text = render(&run, Format::List);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], run.blocks[0].block.to_string());
        assert!(lines[1].starts_with('[') && lines[1].ends_with(']'));
    }

    #[test]
    fn column_prints_one_row_per_presentation() {
        let run = small_run();
        let text = render(&run, Format::Column);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "block,position,category");
        assert_eq!(lines.len(), 1 + 2 * 4);
        assert_eq!(lines[1], format!("0,0,{}", run.blocks[0].block[0]));
        assert!(lines[8].starts_with("1,3,"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_output_reads_back_with_config() {
        let run = small_run();
        let text = render(&run, Format::Json);
        let imported = import_blocks(&text).unwrap();
        assert_eq!(imported.sequence, Some(SequenceConfig::new(1, 2)));
        assert_eq!(imported.blocks, run.clone().into_blocks());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn bare_arrays_import_without_config() {
        let imported = import_blocks("[[0, 1, 1, 0], [0, 1, 0, 1]]").unwrap();
        assert_eq!(imported.sequence, None);
        assert_eq!(imported.blocks.len(), 2);
        assert_eq!(imported.blocks[1].as_slice(), &[0, 1, 0, 1]);
    }

    #[test]
    fn parses_format_names() {
        assert_eq!(Format::parse("CSV"), Some(Format::Column));
        assert_eq!(Format::parse("list"), Some(Format::List));
        #[cfg(feature = "serde")]
        assert_eq!(Format::parse("json"), Some(Format::Json));
        assert_eq!(Format::parse("xml"), None);
    }
}
