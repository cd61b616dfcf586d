//! Decodes JSON payloads into models and encodes them back.
//!
//! Each model type is prepared once per mapper: its descriptor is resolved for
//! the model's platform family, property names are mapped to distinct payload
//! keys, and every referenced transformer is looked up. Misconfiguration surfaces there,
//! before any payload is read.

pub mod options;

pub use options::MapperOptions;

use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::{Map, Number, Value};
use tracing::{debug, trace};

use crate::descriptor::{ModelDescriptor, PrimitiveKind, ResolvedType};
use crate::error::{
    ConfigurationError, DecodeError, EncodeError, FieldError, FieldErrorKind, TransformError,
};
use crate::model::JsonModel;
use crate::platform::PlatformTag;
use crate::transformer::{ImportFn, TransformerRegistry};
use crate::value::{FieldValue, Fields, RawKind};

/// One property bound to its payload key, concrete type and transformer.
#[derive(Clone)]
pub struct FieldBinding {
    pub name: String,
    pub key: String,
    pub resolved: ResolvedType,
    pub optional: bool,
    transformer: Option<(RawKind, ImportFn)>,
}

impl FieldBinding {
    /// Raw kind routed through the transformer, if the property has one.
    pub fn transformer_source(&self) -> Option<RawKind> {
        self.transformer.as_ref().map(|(source, _)| *source)
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("resolved", &self.resolved)
            .field("optional", &self.optional)
            .field("transformer", &self.transformer_source())
            .finish()
    }
}

/// A descriptor resolved against a platform family and one mapper's keys and registry.
#[derive(Debug)]
pub struct PreparedModel {
    descriptor: Arc<ModelDescriptor>,
    platform: PlatformTag,
    bindings: Vec<FieldBinding>,
}

impl PreparedModel {
    pub fn platform(&self) -> PlatformTag {
        self.platform
    }

    pub fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    pub fn bindings(&self) -> &[FieldBinding] {
        &self.bindings
    }

    pub fn binding(&self, name: &str) -> Option<&FieldBinding> {
        self.bindings.iter().find(|b| b.name == name)
    }

    fn maps_key(&self, key: &str) -> bool {
        self.bindings.iter().any(|b| b.key == key)
    }
}

pub struct Mapper {
    registry: Arc<TransformerRegistry>,
    options: MapperOptions,
    prepared: RwLock<HashMap<TypeId, Arc<PreparedModel>>>,
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prepared = self
            .prepared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Mapper")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("prepared_count", &prepared)
            .finish()
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new(TransformerRegistry::with_defaults())
    }
}

impl Mapper {
    pub fn new(registry: TransformerRegistry) -> Self {
        Self::with_options(registry, MapperOptions::default())
    }

    pub fn with_options(registry: TransformerRegistry, options: MapperOptions) -> Self {
        Self::shared(Arc::new(registry), options)
    }

    /// Builds a mapper over a registry shared with other mappers.
    pub fn shared(registry: Arc<TransformerRegistry>, options: MapperOptions) -> Self {
        Self {
            registry,
            options,
            prepared: RwLock::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<TransformerRegistry> {
        &self.registry
    }

    /// Resolves and caches the descriptor of `M`.
    pub fn prepare<M: JsonModel>(&self) -> Result<Arc<PreparedModel>, ConfigurationError> {
        let id = TypeId::of::<M>();
        if let Some(prepared) = self
            .prepared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Ok(Arc::clone(prepared));
        }

        let prepared = Arc::new(self.bind(M::describe()?, M::PLATFORM)?);
        debug!(
            model = prepared.descriptor.model(),
            fields = prepared.bindings.len(),
            platform = %prepared.platform,
            "prepared model descriptor"
        );
        let mut cache = self.prepared.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(id).or_insert(prepared)))
    }

    fn bind(
        &self,
        descriptor: ModelDescriptor,
        platform: PlatformTag,
    ) -> Result<PreparedModel, ConfigurationError> {
        let mut bindings = Vec::with_capacity(descriptor.len());
        let mut keys: HashMap<String, String> = HashMap::with_capacity(descriptor.len());
        for property in descriptor.properties() {
            let resolved = property.resolve(platform)?;
            let transformer = match property.transformer {
                Some(r) => {
                    let target = resolved.target();
                    let import = self
                        .registry
                        .import_fn(r.source(), target)
                        .cloned()
                        .ok_or_else(|| ConfigurationError::UnregisteredTransformer {
                            property: property.name.clone(),
                            raw: r.source(),
                            target: target.name(),
                        })?;
                    Some((r.source(), import))
                }
                None => None,
            };
            let key = self.options.key_mapper.key_for(&property.name);
            match keys.entry(key.clone()) {
                Entry::Occupied(e) => {
                    return Err(ConfigurationError::DuplicateKey {
                        model: descriptor.model().to_string(),
                        key,
                        first: e.get().clone(),
                        second: property.name.clone(),
                    })
                }
                Entry::Vacant(e) => {
                    e.insert(property.name.clone());
                }
            }
            bindings.push(FieldBinding {
                name: property.name.clone(),
                key,
                resolved,
                optional: property.optional,
                transformer,
            });
        }
        Ok(PreparedModel {
            descriptor: Arc::new(descriptor),
            platform,
            bindings,
        })
    }

    /// Decodes a JSON object into a fresh `M`, collecting every field failure.
    pub fn decode<M: JsonModel>(&self, payload: &Value) -> Result<M, DecodeError> {
        let prepared = self.prepare::<M>()?;
        self.decode_prepared(&prepared, payload)
    }

    fn decode_prepared<M: JsonModel>(
        &self,
        prepared: &PreparedModel,
        payload: &Value,
    ) -> Result<M, DecodeError> {
        let model = prepared.descriptor.model();
        let Value::Object(object) = payload else {
            return Err(DecodeError::UnexpectedPayload {
                model: model.to_string(),
                expected: RawKind::Object,
                found: RawKind::of(payload),
            });
        };

        let mut fields = Fields::new();
        let mut errors = Vec::new();
        for binding in &prepared.bindings {
            match decode_field(binding, object.get(&binding.key)) {
                Ok(Some(value)) => {
                    fields.insert_value(binding.name.clone(), value);
                }
                Ok(None) => {}
                Err(kind) => errors.push(FieldError::new(binding.name.clone(), kind)),
            }
        }
        if self.options.deny_unknown_keys {
            for key in object.keys().filter(|k| !prepared.maps_key(k)) {
                errors.push(FieldError::new(key.clone(), FieldErrorKind::UnknownKey));
            }
        }
        if !errors.is_empty() {
            return Err(fields_error(model, errors));
        }
        match M::from_fields(&mut fields) {
            Ok(instance) => {
                trace!(model, "decoded model");
                Ok(instance)
            }
            Err(e) => Err(fields_error(model, vec![e])),
        }
    }

    /// Parses JSON text, then decodes it.
    pub fn decode_str<M: JsonModel>(&self, json: &str) -> Result<M, DecodeError> {
        let payload: Value = serde_json::from_str(json)?;
        self.decode(&payload)
    }

    /// Decodes a JSON array of objects, failing on the first bad element.
    pub fn decode_array<M: JsonModel>(&self, payload: &Value) -> Result<Vec<M>, DecodeError> {
        let prepared = self.prepare::<M>()?;
        let Value::Array(items) = payload else {
            return Err(DecodeError::UnexpectedPayload {
                model: prepared.descriptor.model().to_string(),
                expected: RawKind::Array,
                found: RawKind::of(payload),
            });
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                self.decode_prepared::<M>(&prepared, item)
                    .map_err(|e| DecodeError::Element {
                        index,
                        source: Box::new(e),
                    })
            })
            .collect()
    }

    /// Exports `model` as a JSON object with keys in declaration order.
    pub fn encode<M: JsonModel>(&self, model: &M) -> Result<Value, EncodeError> {
        let prepared = self.prepare::<M>()?;
        let fields = model.to_fields();
        let mut object = Map::new();
        for binding in &prepared.bindings {
            let Some(value) = fields.get(&binding.name) else {
                if binding.optional {
                    continue;
                }
                return Err(EncodeError::MissingField {
                    model: prepared.descriptor.model().to_string(),
                    field: binding.name.clone(),
                });
            };
            let raw = self
                .encode_field(binding, value)
                .map_err(|source| EncodeError::Transform {
                    field: binding.name.clone(),
                    source,
                })?;
            object.insert(binding.key.clone(), raw);
        }
        trace!(model = prepared.descriptor.model(), "encoded model");
        Ok(Value::Object(object))
    }

    pub fn encode_string<M: JsonModel>(&self, model: &M) -> Result<String, EncodeError> {
        Ok(serde_json::to_string(&self.encode(model)?)?)
    }

    fn encode_field(
        &self,
        binding: &FieldBinding,
        value: &FieldValue,
    ) -> Result<Value, TransformError> {
        let wrong_type = || {
            TransformError::invalid(
                binding.resolved.target().name(),
                value.target().name(),
                "wrong type",
            )
        };
        match binding.resolved {
            ResolvedType::Primitive(PrimitiveKind::Bool) => value
                .downcast_ref::<bool>()
                .map(|b| Value::Bool(*b))
                .ok_or_else(wrong_type),
            ResolvedType::Primitive(PrimitiveKind::Int) => value
                .downcast_ref::<i64>()
                .map(|n| Value::from(*n))
                .ok_or_else(wrong_type),
            ResolvedType::Primitive(PrimitiveKind::Float) => {
                let f = *value.downcast_ref::<f64>().ok_or_else(wrong_type)?;
                Number::from_f64(f).map(Value::Number).ok_or_else(|| {
                    TransformError::invalid("f64", f.to_string(), "not representable in JSON")
                })
            }
            ResolvedType::String => value
                .downcast_ref::<String>()
                .map(|s| Value::String(s.clone()))
                .ok_or_else(wrong_type),
            ResolvedType::Custom(target) if value.target() == target => {
                self.registry.export(value)
            }
            ResolvedType::Custom(_) => Err(wrong_type()),
        }
    }
}

fn fields_error(model: &str, errors: Vec<FieldError>) -> DecodeError {
    debug!(model, errors = errors.len(), "decode failed");
    DecodeError::Fields {
        model: model.to_string(),
        errors,
    }
}

/// Decodes one property. `Ok(None)` means an absent optional value.
fn decode_field(
    binding: &FieldBinding,
    raw: Option<&Value>,
) -> Result<Option<FieldValue>, FieldErrorKind> {
    let raw = match raw {
        None | Some(Value::Null) if binding.optional => return Ok(None),
        None | Some(Value::Null) => return Err(FieldErrorKind::Missing),
        Some(raw) => raw,
    };
    if let Some((source, import)) = &binding.transformer {
        if *source == RawKind::of(raw) {
            return import(raw).map(Some).map_err(FieldErrorKind::from);
        }
    }
    coerce(binding, raw).map(Some)
}

/// Converts a raw value into the resolved type without a transformer.
fn coerce(binding: &FieldBinding, raw: &Value) -> Result<FieldValue, FieldErrorKind> {
    let value = match (binding.resolved, raw) {
        (ResolvedType::Primitive(PrimitiveKind::Bool), Value::Bool(b)) => Some(FieldValue::new(*b)),
        (ResolvedType::Primitive(PrimitiveKind::Int), Value::Number(n)) => {
            n.as_i64().map(FieldValue::new)
        }
        (ResolvedType::Primitive(PrimitiveKind::Float), Value::Number(n)) => {
            n.as_f64().map(FieldValue::new)
        }
        (ResolvedType::String, Value::String(s)) => Some(FieldValue::new(s.clone())),
        _ => None,
    };
    value.ok_or_else(|| FieldErrorKind::TypeMismatch {
        expected: expected_input(binding).to_string(),
        found: describe_raw(raw).to_string(),
    })
}

fn expected_input(binding: &FieldBinding) -> &'static str {
    match binding.resolved {
        ResolvedType::Primitive(PrimitiveKind::Int) => "integer",
        resolved => resolved
            .native_source()
            .or_else(|| binding.transformer_source())
            .map_or_else(|| resolved.target().name(), RawKind::name),
    }
}

fn describe_raw(raw: &Value) -> &'static str {
    match raw {
        Value::Number(n) if !n.is_i64() && !n.is_u64() => "fractional number",
        other => RawKind::of(other).name(),
    }
}
