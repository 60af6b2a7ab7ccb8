use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use feature_dict::FeatureDictionary;
use tracing::info;
use weight_codec::{Weight, WeightCodec, init_sparse_vector};

use crate::config::{ConvertSettings, InspectSettings, load_settings};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Weight file to read (`-` for stdin, `.zst` for compressed input).
    pub weights: PathBuf,
    /// Perfect hash parameters backing the feature dictionary.
    #[arg(long)]
    pub hash: Option<PathBuf>,
    /// TOML settings; defaults to `inspect.toml` when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Print feature names in the order they were read.
    #[arg(long)]
    pub names: bool,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Weight file to read.
    pub input: PathBuf,
    /// Destination file (`-` for stdout, `.zst` to compress).
    pub output: PathBuf,
    /// Perfect hash parameters; output is binary when set.
    #[arg(long)]
    pub hash: Option<PathBuf>,
    /// TOML settings; defaults to `convert.toml` when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Drop zero weights from text output.
    #[arg(long)]
    pub hide_zeros: bool,
    /// Comment line written at the top of text output.
    #[arg(long)]
    pub comment: Option<String>,
}

/// Dictionary and weights as left by a load.
struct LoadedWeights {
    dict: FeatureDictionary,
    weights: Vec<Weight>,
    names: Vec<String>,
}

pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let settings = load_settings::<InspectSettings>("inspect", args.config)?;
    let codec = WeightCodec::new(settings.codec);
    let perfect_hash = args.hash.or(settings.perfect_hash);
    let loaded = load_weights(
        &codec,
        &args.weights,
        perfect_hash.as_deref(),
        settings.freeze_after_load,
    )?;

    println!(
        "{}",
        render_summary(&loaded.dict, &loaded.weights, loaded.names.len())
    );
    codec.show_largest_features(&loaded.weights, &loaded.dict);

    if args.names {
        for name in &loaded.names {
            println!("{name}");
        }
    }
    Ok(())
}

/// Rewrites a weight file. Only the weights go to the output, so `-` yields a
/// clean stream on stdout.
pub fn run_convert(args: ConvertArgs) -> Result<()> {
    let settings = load_settings::<ConvertSettings>("convert", args.config)?;
    let codec = WeightCodec::new(settings.codec);
    let perfect_hash = args.hash.or(settings.perfect_hash);
    let loaded = load_weights(
        &codec,
        &args.input,
        perfect_hash.as_deref(),
        settings.freeze_after_load,
    )?;

    prepare_output(&args.output)?;
    let hide_zeros = args.hide_zeros || settings.hide_zero_features;
    let comment = args.comment.or(settings.comment);
    let format = codec
        .write_to_file(
            &args.output,
            &loaded.dict,
            &loaded.weights,
            hide_zeros,
            comment.as_deref(),
        )
        .with_context(|| format!("failed to write weights to {}", args.output.display()))?;
    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        %format,
        features = loaded.dict.num_feats(),
        "conversion finished"
    );
    Ok(())
}

/// Loads `input` through a fresh dictionary, backed by `perfect_hash` when given.
///
/// Hash-backed vectors are padded to one slot per key so they can be written
/// in binary form whatever the input format was.
fn load_weights(
    codec: &WeightCodec,
    input: &Path,
    perfect_hash: Option<&Path>,
    freeze: bool,
) -> Result<LoadedWeights> {
    let mut dict = build_dictionary(perfect_hash)?;
    let (mut weights, names) = codec
        .init_from_file_with_names(input, &mut dict)
        .with_context(|| format!("failed to load weights from {}", input.display()))?;
    if dict.using_perfect_hash() && weights.len() < dict.num_feats() {
        weights.resize(dict.num_feats(), 0.0);
    }
    if freeze {
        dict.freeze();
    }
    Ok(LoadedWeights {
        dict,
        weights,
        names,
    })
}

fn build_dictionary(perfect_hash: Option<&Path>) -> Result<FeatureDictionary> {
    let mut dict = FeatureDictionary::new();
    if let Some(path) = perfect_hash {
        dict.enable_hash_from_file(path)
            .with_context(|| format!("failed to load perfect hash from {}", path.display()))?;
    }
    Ok(dict)
}

fn render_summary(dict: &FeatureDictionary, weights: &[Weight], entries: usize) -> String {
    let sparse = init_sparse_vector(weights);
    let mode = if dict.using_perfect_hash() {
        "perfect-hash"
    } else {
        "growable"
    };
    [
        format!("dictionary = {mode}"),
        format!("frozen = {}", dict.is_frozen()),
        format!("num_feats = {}", dict.num_feats()),
        format!("text_entries = {entries}"),
        format!("vector_length = {}", weights.len()),
        format!("non_zero = {}", sparse.len()),
    ]
    .join("\n")
}

/// Creates the directory that will hold `output`; stdout needs none.
fn prepare_output(output: &Path) -> Result<()> {
    if output == Path::new("-") {
        return Ok(());
    }
    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .with_context(|| format!("cannot create output directory {}", dir.display())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_dict::DisplacementHash;
    use tempfile::tempdir;
    use weight_codec::MAGIC;

    #[test]
    fn summary_counts_non_zero_weights() {
        let mut dict = FeatureDictionary::new();
        dict.convert("a");
        dict.convert("b");
        let summary = render_summary(&dict, &[0.0, 1.0, 0.0], 2);
        assert!(summary.contains("dictionary = growable"));
        assert!(summary.contains("frozen = false"));
        assert!(summary.contains("num_feats = 3"));
        assert!(summary.contains("non_zero = 1"));
    }

    #[test]
    fn convert_writes_text_output_into_new_directory() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        std::fs::write(&input, "b 2\na=0\nc\t-1\n").unwrap();
        let output = dir.path().join("nested/out.txt");

        run_convert(ConvertArgs {
            input,
            output: output.clone(),
            hash: None,
            config: Some(write_config(dir.path(), "")),
            hide_zeros: true,
            comment: Some("converted".to_string()),
        })
        .unwrap();

        let written = std::fs::read_to_string(output).unwrap();
        assert_eq!(written, "# converted\nb 2.0\nc -1.0\n");
    }

    #[test]
    fn convert_with_hash_turns_text_into_binary() {
        let dir = tempdir().unwrap();
        let hash_path = dir.path().join("features.phf");
        DisplacementHash::from_parts(42, vec![(7, 1), (2, 9), (4, 4)], 6)
            .unwrap()
            .write(&hash_path)
            .unwrap();
        let input = dir.path().join("in.txt");
        std::fs::write(&input, "LanguageModel 1.5\n").unwrap();
        let output = dir.path().join("out.bin");

        run_convert(ConvertArgs {
            input,
            output: output.clone(),
            hash: Some(hash_path.clone()),
            config: Some(write_config(dir.path(), "")),
            hide_zeros: false,
            comment: None,
        })
        .unwrap();

        let raw = std::fs::read(&output).unwrap();
        assert_eq!(&raw[..5], MAGIC);
        assert_eq!(raw.len(), 5 + 8 + 6 * 8);

        let mut dict = build_dictionary(Some(&hash_path)).unwrap();
        let id = dict.convert("LanguageModel");
        let weights = WeightCodec::default()
            .init_from_file(&output, &mut dict)
            .unwrap();
        assert_eq!(weights.len(), 6);
        assert_eq!(weights[id], 1.5);
    }

    #[test]
    fn freeze_after_load_stops_growth() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        std::fs::write(&input, "a 1\n").unwrap();

        let mut loaded = load_weights(&WeightCodec::default(), &input, None, true).unwrap();
        assert!(loaded.dict.is_frozen());
        assert_eq!(loaded.dict.convert("unseen"), 0);
        assert_eq!(loaded.dict.num_feats(), 2);

        let loaded = load_weights(&WeightCodec::default(), &input, None, false).unwrap();
        assert!(!loaded.dict.is_frozen());
    }

    #[test]
    fn missing_hash_file_is_reported() {
        let err = build_dictionary(Some(Path::new("missing/features.phf"))).unwrap_err();
        assert!(err.to_string().contains("failed to load perfect hash"));
    }

    #[test]
    fn stdout_needs_no_output_directory() {
        prepare_output(Path::new("-")).unwrap();
        prepare_output(Path::new("bare.txt")).unwrap();
    }

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("convert.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }
}
