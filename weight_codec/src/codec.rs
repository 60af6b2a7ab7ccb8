use std::io::{BufReader, Cursor, Read, Write};
use std::path::Path;

use feature_dict::FeatureDictionary;
use tracing::info;

use crate::config::CodecConfig;
use crate::diagnostics::{largest_features, sanity_check};
use crate::error::WeightsError;
use crate::format::{MAGIC, WeightFormat};
use crate::stream::{WeightSink, open_reader};
use crate::{Weight, binary, text};

/// Loads and saves weight vectors, translating names through a caller-owned
/// [`FeatureDictionary`].
#[derive(Clone, Debug, Default)]
pub struct WeightCodec {
    config: CodecConfig,
}

impl WeightCodec {
    /// Creates a codec reporting progress according to `config`.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Progress and reporting settings in use.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Reads a weight file, detecting text or binary layout from its first bytes.
    ///
    /// Text entries register their names in `dict`; binary files must carry
    /// exactly `dict.num_feats()` weights.
    pub fn init_from_file<P: AsRef<Path>>(
        &self,
        path: P,
        dict: &mut FeatureDictionary,
    ) -> Result<Vec<Weight>, WeightsError> {
        self.load(path.as_ref(), dict, None)
    }

    /// Like [`init_from_file`](Self::init_from_file), also returning the
    /// feature names of a text file in the order they were read.
    pub fn init_from_file_with_names<P: AsRef<Path>>(
        &self,
        path: P,
        dict: &mut FeatureDictionary,
    ) -> Result<(Vec<Weight>, Vec<String>), WeightsError> {
        let mut names = Vec::new();
        let weights = self.load(path.as_ref(), dict, Some(&mut names))?;
        Ok((weights, names))
    }

    /// Detects the format of `reader`, parses it and validates the result.
    pub fn read_from<R: Read>(
        &self,
        mut reader: R,
        dict: &mut FeatureDictionary,
        names: Option<&mut Vec<String>>,
    ) -> Result<(Vec<Weight>, WeightFormat), WeightsError> {
        let mut probe = Vec::with_capacity(MAGIC.len());
        reader
            .by_ref()
            .take(MAGIC.len() as u64)
            .read_to_end(&mut probe)?;
        let format = WeightFormat::detect(&probe);

        let weights = match format {
            WeightFormat::Binary => binary::read_weights(reader, dict)?,
            WeightFormat::Text => {
                let mut weights = Vec::new();
                let stream = BufReader::new(Cursor::new(probe).chain(reader));
                text::read_weights(stream, dict, &mut weights, names, &self.config)?;
                weights
            }
        };
        sanity_check(&weights)?;
        Ok((weights, format))
    }

    /// Writes `weights` to `path`: binary for hash-backed dictionaries, text otherwise.
    pub fn write_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        dict: &FeatureDictionary,
        weights: &[Weight],
        hide_zero_value_features: bool,
        extra_comment: Option<&str>,
    ) -> Result<WeightFormat, WeightsError> {
        let path = path.as_ref();
        let format = WeightFormat::for_dictionary(dict);
        if format == WeightFormat::Binary {
            binary::check_capacity(dict, weights)?;
        }
        let mut sink = WeightSink::create(path)?;
        let records = self.write_records(
            &mut sink,
            format,
            dict,
            weights,
            hide_zero_value_features,
            extra_comment,
        )?;
        sink.finish()?;
        info!(path = %path.display(), %format, records, "weights written");
        Ok(format)
    }

    /// Stream variant of [`write_to_file`](Self::write_to_file).
    pub fn write_to<W: Write>(
        &self,
        mut out: W,
        dict: &FeatureDictionary,
        weights: &[Weight],
        hide_zero_value_features: bool,
        extra_comment: Option<&str>,
    ) -> Result<WeightFormat, WeightsError> {
        let format = WeightFormat::for_dictionary(dict);
        self.write_records(
            &mut out,
            format,
            dict,
            weights,
            hide_zero_value_features,
            extra_comment,
        )?;
        out.flush()?;
        Ok(format)
    }

    /// Logs the largest weights by magnitude as `name=value` pairs.
    pub fn show_largest_features(&self, weights: &[Weight], dict: &FeatureDictionary) {
        let top = largest_features(weights, self.config.top_features)
            .into_iter()
            .map(|(id, value)| format!("{}={}", dict.name(id), value))
            .collect::<Vec<_>>()
            .join(" ");
        info!(top = %top, "top features");
    }

    fn load(
        &self,
        path: &Path,
        dict: &mut FeatureDictionary,
        names: Option<&mut Vec<String>>,
    ) -> Result<Vec<Weight>, WeightsError> {
        info!(path = %path.display(), "reading weights");
        let reader = open_reader(path)?;
        let (weights, format) = self.read_from(reader, dict, names)?;
        let payload_bytes = (format == WeightFormat::Binary)
            .then(|| std::mem::size_of_val(weights.as_slice()));
        info!(
            path = %path.display(),
            %format,
            features = weights.len(),
            bytes = ?payload_bytes,
            "weights loaded"
        );
        Ok(weights)
    }

    fn write_records<W: Write>(
        &self,
        out: &mut W,
        format: WeightFormat,
        dict: &FeatureDictionary,
        weights: &[Weight],
        hide_zero_value_features: bool,
        extra_comment: Option<&str>,
    ) -> Result<usize, WeightsError> {
        match format {
            WeightFormat::Text => text::write_weights(
                out,
                dict,
                weights,
                hide_zero_value_features,
                extra_comment,
            ),
            WeightFormat::Binary => binary::write_weights(out, dict, weights),
        }
    }
}
