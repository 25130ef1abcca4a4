use crate::domain::ports::DecodedObject;
use crate::models::{DatasetHeader, DecisionTree, FilteredModel, LinearRegression};
use crate::utils::error::{DecodeCause, Result, ViewerError};
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const STREAM_MAGIC: &[u8; 4] = b"MVSR";
pub const FORMAT_VERSION: u16 = 1;
pub const DEFAULT_MAX_RECORD_BYTES: u64 = 1 << 30;
/// 型別名稱（含 8 位元組長度前綴）的上限，與記錄上限分開計算
pub const MAX_TYPE_NAME_BYTES: u64 = 1024;

const HEADER_LEN: usize = STREAM_MAGIC.len() + 2;

pub type DecodedObjects = Vec<Box<dyn DecodedObject>>;

type DecodeFn = fn(&[u8], u64) -> bincode::Result<Box<dyn DecodedObject>>;

/// 串流中的一筆記錄：型別名稱加上該型別的 bincode 內容
#[derive(Debug, Serialize)]
struct RecordFrame {
    type_name: String,
    payload: Vec<u8>,
}

fn frame_options(limit: u64) -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(limit)
}

fn payload_options(limit: u64) -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
        .with_limit(limit)
}

fn decode_boxed<T>(payload: &[u8], limit: u64) -> bincode::Result<Box<dyn DecodedObject>>
where
    T: DecodedObject + DeserializeOwned + 'static,
{
    let value: T = payload_options(limit).deserialize(payload)?;
    Ok(Box::new(value))
}

/// 型別名稱對應到重建該型別的解碼函式
#[derive(Clone, Default)]
pub struct TypeRegistry {
    decoders: BTreeMap<String, DecodeFn>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_models() -> Self {
        let mut registry = Self::new();
        registry.register::<DecisionTree>();
        registry.register::<LinearRegression>();
        registry.register::<DatasetHeader>();
        registry.register::<FilteredModel>();
        registry
    }

    /// 以 `std::any::type_name` 註冊型別
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: DecodedObject + DeserializeOwned + 'static,
    {
        self.register_as::<T>(std::any::type_name::<T>())
    }

    /// 以指定名稱註冊，供覆寫 [`DecodedObject::type_name`] 的型別使用
    pub fn register_as<T>(&mut self, type_name: impl Into<String>) -> &mut Self
    where
        T: DecodedObject + DeserializeOwned + 'static,
    {
        self.decoders.insert(type_name.into(), decode_boxed::<T>);
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.decoders.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.decoders.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    fn decode(
        &self,
        index: usize,
        frame: &RecordFrame,
        limit: u64,
    ) -> std::result::Result<Box<dyn DecodedObject>, DecodeCause> {
        let decoder = self
            .decoders
            .get(&frame.type_name)
            .ok_or_else(|| DecodeCause::UnresolvedType {
                index,
                type_name: frame.type_name.clone(),
            })?;

        decoder(&frame.payload, limit).map_err(|e| DecodeCause::Malformed {
            index,
            message: format!("cannot reconstruct {}: {}", frame.type_name, e),
        })
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct StreamReader {
    registry: TypeRegistry,
    max_record_bytes: u64,
}

impl StreamReader {
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry,
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
        }
    }

    pub fn with_max_record_bytes(mut self, max_record_bytes: u64) -> Self {
        self.max_record_bytes = max_record_bytes;
        self
    }

    /// 依串流順序讀出所有物件；任何一筆失敗即整體失敗
    pub fn read_all(&self, path: &Path) -> Result<DecodedObjects> {
        tracing::debug!("Opening serialized stream {}", path.display());

        let file = File::open(path).map_err(|e| ViewerError::decode(path, e))?;
        let objects = self
            .decode_stream(BufReader::new(file))
            .map_err(|cause| ViewerError::decode(path, cause))?;

        tracing::debug!("Decoded {} object(s) from {}", objects.len(), path.display());
        Ok(objects)
    }

    pub(crate) fn decode_stream<R: BufRead>(
        &self,
        mut reader: R,
    ) -> std::result::Result<DecodedObjects, DecodeCause> {
        read_header(&mut reader)?;

        let mut objects: DecodedObjects = Vec::new();
        loop {
            // EOF 剛好落在記錄邊界才是正常結束
            if reader.fill_buf()?.is_empty() {
                break;
            }

            let index = objects.len();
            // 名稱與內容各自限制長度，避免依長度前綴先配置大量記憶體
            let type_name: String = frame_options(MAX_TYPE_NAME_BYTES)
                .deserialize_from(&mut reader)
                .map_err(|e| frame_error(index, e))?;
            let payload: Vec<u8> = frame_options(self.max_record_bytes)
                .deserialize_from(&mut reader)
                .map_err(|e| frame_error(index, e))?;
            let frame = RecordFrame { type_name, payload };

            tracing::trace!("Record #{} declares {}", index, frame.type_name);
            objects.push(self.registry.decode(index, &frame, self.max_record_bytes)?);
        }

        Ok(objects)
    }
}

impl Default for StreamReader {
    fn default() -> Self {
        Self::new(TypeRegistry::with_builtin_models())
    }
}

fn read_header<R: Read>(reader: &mut R) -> std::result::Result<(), DecodeCause> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    reader.take(HEADER_LEN as u64).read_to_end(&mut header)?;

    if header.len() < HEADER_LEN || &header[..STREAM_MAGIC.len()] != STREAM_MAGIC {
        return Err(DecodeCause::BadHeader { found: header });
    }

    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != FORMAT_VERSION {
        return Err(DecodeCause::UnsupportedVersion(version));
    }

    Ok(())
}

fn frame_error(index: usize, error: bincode::Error) -> DecodeCause {
    match *error {
        bincode::ErrorKind::Io(ref io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
            DecodeCause::Truncated { index }
        }
        other => DecodeCause::Malformed {
            index,
            message: other.to_string(),
        },
    }
}

/// 寫出與 [`StreamReader`] 相容的串流檔案
pub struct StreamWriter {
    path: PathBuf,
    out: BufWriter<File>,
    written: usize,
}

impl StreamWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| ViewerError::Persistence {
            path: path.clone(),
            source,
        })?;

        let mut writer = Self {
            path,
            out: BufWriter::new(file),
            written: 0,
        };
        writer.write_bytes(STREAM_MAGIC)?;
        writer.write_bytes(&FORMAT_VERSION.to_le_bytes())?;
        Ok(writer)
    }

    /// 寫入一筆記錄，以 `value.type_name()` 標記型別
    pub fn write<T>(&mut self, value: &T) -> Result<()>
    where
        T: DecodedObject + Serialize,
    {
        let payload = payload_options(u64::MAX)
            .serialize(value)
            .map_err(|e| self.persistence_error(e))?;
        let frame = RecordFrame {
            type_name: value.type_name().to_string(),
            payload,
        };

        let bytes = frame_options(u64::MAX)
            .serialize(&frame)
            .map_err(|e| self.persistence_error(e))?;
        self.write_bytes(&bytes)?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> Result<usize> {
        let path = self.path.clone();
        self.out
            .flush()
            .map_err(|source| ViewerError::Persistence { path, source })?;
        Ok(self.written)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.out
            .write_all(bytes)
            .map_err(|source| ViewerError::Persistence {
                path: self.path.clone(),
                source,
            })
    }

    fn persistence_error(&self, error: bincode::Error) -> ViewerError {
        let source = match *error {
            bincode::ErrorKind::Io(io) => io,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other.to_string()),
        };
        ViewerError::Persistence {
            path: self.path.clone(),
            source,
        }
    }
}
