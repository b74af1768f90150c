//! Form engine - the main entry point for binding templates and building forms

use crate::binding::{BindingContext, Proxy};
use crate::cache::{CacheStats, TemplateCache};
use crate::config::EngineConfig;
use crate::evaluator::Evaluator;
use crate::form::{
    ArgumentDefinition, CompiledField, CompiledForm, FieldDefinition, FormError, FormResult,
    ValidatorDefinition,
};
use crate::model::FormValue;
use crate::parser::ParseResult;
use crate::registry::FilterRegistry;
use crate::template::Template;
use crate::validation::{
    ComparatorKind, FieldValidator, MessageSource, ValidationPipe, ValidationRule, ValueConverter,
};
use indexmap::IndexMap;
use std::sync::Arc;

/// Parses templates once and binds them to data contexts
///
/// The engine itself is `Send + Sync` and can be shared; the proxies and
/// forms it builds are single-threaded.
#[derive(Debug)]
pub struct FormEngine {
    config: EngineConfig,
    evaluator: Evaluator,
    templates: TemplateCache,
}

impl Default for FormEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl FormEngine {
    /// Create an engine using the standard filters
    pub fn new(config: EngineConfig) -> Self {
        Self::with_registry(config, FilterRegistry::shared_standard())
    }

    /// Create an engine using a custom filter registry
    pub fn with_registry(config: EngineConfig, registry: Arc<FilterRegistry>) -> Self {
        let evaluator = Evaluator::new(registry).with_culture(config.culture.clone());
        let templates = TemplateCache::new(config.template_cache_size);
        Self {
            config,
            evaluator,
            templates,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluator handed to every proxy
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Filter registry
    pub fn registry(&self) -> &Arc<FilterRegistry> {
        self.evaluator.registry()
    }

    /// Parsed template for `source`, from the cache when possible
    pub fn template(&self, source: &str) -> ParseResult<Arc<Template>> {
        self.templates.get_or_parse(source)
    }

    /// Template cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.templates.stats()
    }

    /// Bind a template to a context pair
    pub fn bind(&self, source: &str, binding: &BindingContext) -> ParseResult<Proxy> {
        let template = self.template(source)?;
        Ok(Proxy::with_pass_limit(
            template,
            binding.clone(),
            self.evaluator.clone(),
            self.config.max_coalesced_passes,
        ))
    }

    /// Evaluate a template once without keeping a binding
    pub fn evaluate(&self, source: &str, binding: &BindingContext) -> ParseResult<FormValue> {
        let template = self.template(source)?;
        Ok(self.evaluator.evaluate(template.root(), binding))
    }

    /// Compile one field definition
    pub fn compile_field(
        &self,
        definition: &FieldDefinition,
        binding: &BindingContext,
    ) -> FormResult<CompiledField> {
        let field = FieldCompiler {
            engine: self,
            key: &definition.key,
            binding,
        };

        let value = field.bind("key", &format!("{{Binding {}}}", definition.key))?;
        let name = field.bind_optional("name", definition.name.as_deref())?;
        let tooltip = field.bind_optional("tooltip", definition.tooltip.as_deref())?;
        let visible = field
            .bind_optional("isVisible", definition.is_visible.as_deref())?
            .unwrap_or_else(|| Proxy::constant(true));
        let enabled = field
            .bind_optional("isEnabled", definition.is_enabled.as_deref())?
            .unwrap_or_else(|| Proxy::constant(true));

        let pipe = definition
            .validators
            .iter()
            .map(|validator| field.rule(validator))
            .collect::<FormResult<ValidationPipe>>()?;
        let validator =
            FieldValidator::new(value.clone(), pipe, self.config.max_coalesced_passes);

        log::debug!(
            "Compiled field '{}' with {} validators",
            definition.key,
            definition.validators.len()
        );

        Ok(CompiledField {
            key: definition.key.clone(),
            value,
            name,
            tooltip,
            visible,
            enabled,
            hidden_on_false: definition.hidden_on_false,
            validator,
            culture: self.config.culture.clone(),
        })
    }

    /// Compile every field; the first error aborts the whole form
    pub fn compile_form(
        &self,
        definitions: &[FieldDefinition],
        binding: &BindingContext,
    ) -> FormResult<CompiledForm> {
        let mut fields = IndexMap::with_capacity(definitions.len());
        for definition in definitions {
            if fields.contains_key(&definition.key) {
                return Err(FormError::DuplicateField {
                    key: definition.key.clone(),
                });
            }
            let field = self.compile_field(definition, binding)?;
            fields.insert(definition.key.clone(), field);
        }
        log::debug!("Compiled form with {} fields", fields.len());
        Ok(CompiledForm {
            fields,
            binding: binding.clone(),
        })
    }

    /// Deserialize a JSON array of field definitions and compile it
    pub fn compile_form_json(&self, json: &str, binding: &BindingContext) -> FormResult<CompiledForm> {
        let definitions: Vec<FieldDefinition> = serde_json::from_str(json)?;
        self.compile_form(&definitions, binding)
    }
}

struct FieldCompiler<'a> {
    engine: &'a FormEngine,
    key: &'a str,
    binding: &'a BindingContext,
}

impl FieldCompiler<'_> {
    fn bind(&self, attribute: &str, source: &str) -> FormResult<Proxy> {
        self.engine
            .bind(source, self.binding)
            .map_err(|source_error| FormError::Template {
                field: self.key.to_string(),
                attribute: attribute.to_string(),
                template: source.to_string(),
                source: source_error,
            })
    }

    fn bind_optional(&self, attribute: &str, source: Option<&str>) -> FormResult<Option<Proxy>> {
        source.map(|source| self.bind(attribute, source)).transpose()
    }

    fn rule(&self, definition: &ValidatorDefinition) -> FormResult<ValidationRule> {
        let config = &self.engine.config;
        let comparator = ComparatorKind::from_name(&definition.comparator).ok_or_else(|| {
            FormError::UnknownComparator {
                field: self.key.to_string(),
                name: definition.comparator.clone(),
            }
        })?;

        let mut rule = ValidationRule::new(comparator)
            .with_null_policy(definition.null_policy)
            .with_strict(definition.strict.unwrap_or(config.strict_validation))
            .with_validates_on_target_updated(
                definition
                    .validates_on_target_updated
                    .unwrap_or(config.validates_on_target_updated),
            );

        match &definition.argument {
            Some(ArgumentDefinition::Template(source)) => {
                rule = rule.with_argument(self.bind("argument", source)?);
            }
            Some(ArgumentDefinition::Value(value)) => {
                rule = rule.with_argument(Proxy::constant(FormValue::from_json(value.clone())));
            }
            None => {}
        }

        if let Some(source) = &definition.is_enforced {
            rule = rule.with_enforcement(self.bind("isEnforced", source)?);
        }

        let message = match &definition.message {
            Some(source) => {
                let proxy = self.bind("message", source)?;
                if proxy.template().is_some_and(|t| t.is_constant()) {
                    MessageSource::Static(match proxy.value() {
                        FormValue::String(text) => text,
                        other => config.culture.format(&other),
                    })
                } else {
                    MessageSource::Proxy(proxy)
                }
            }
            None => MessageSource::Static(format!("{} validation failed", definition.comparator)),
        };
        rule = rule.with_message(message);

        if let Some(name) = &definition.converter {
            let converter = self
                .engine
                .registry()
                .resolve(name)
                .and_then(|filter| ValueConverter::new(filter, config.culture.clone()))
                .ok_or_else(|| FormError::UnknownConverter {
                    field: self.key.to_string(),
                    name: name.clone(),
                })?;
            rule = rule.with_converter(converter);
        }

        Ok(rule)
    }
}
