// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bound fields and forms
//!
//! These are the handles a view layer consumes: a value, a label, a
//! visibility, an enablement flag and a validity result per field.

use super::visibility::Visibility;
use crate::binding::{BindingContext, Proxy};
use crate::model::{Culture, DataContext, FormValue};
use crate::validation::{FieldValidator, ValidationResult};
use indexmap::IndexMap;
use std::rc::Rc;

/// One field with every attribute bound
#[derive(Debug, Clone)]
pub struct CompiledField {
    pub(crate) key: String,
    pub(crate) value: Proxy,
    pub(crate) name: Option<Proxy>,
    pub(crate) tooltip: Option<Proxy>,
    pub(crate) visible: Proxy,
    pub(crate) enabled: Proxy,
    pub(crate) hidden_on_false: bool,
    pub(crate) validator: FieldValidator,
    pub(crate) culture: Culture,
}

impl CompiledField {
    /// Model property the field edits
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Proxy reading the field value
    pub fn value_proxy(&self) -> &Proxy {
        &self.value
    }

    /// Current field value
    pub fn value(&self) -> FormValue {
        self.value.value()
    }

    /// Current label text
    pub fn name(&self) -> Option<String> {
        self.name.as_ref().map(|proxy| self.text(proxy))
    }

    /// Current tooltip text
    pub fn tooltip(&self) -> Option<String> {
        self.tooltip.as_ref().map(|proxy| self.text(proxy))
    }

    /// Proxy deciding visibility
    pub fn visibility_proxy(&self) -> &Proxy {
        &self.visible
    }

    /// Current layout visibility
    pub fn visibility(&self) -> Visibility {
        Visibility::from_value(&self.visible.value(), self.hidden_on_false)
    }

    /// Whether the field is currently shown
    pub fn is_visible(&self) -> bool {
        self.visibility().is_visible()
    }

    /// Proxy deciding enablement
    pub fn enablement_proxy(&self) -> &Proxy {
        &self.enabled
    }

    /// Whether the field currently accepts input
    pub fn is_enabled(&self) -> bool {
        self.enabled.is_truthy()
    }

    /// Live validator
    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    /// Whether the field currently validates
    pub fn is_valid(&self) -> bool {
        self.validator.is_valid()
    }

    /// Every proxy owned by the field
    pub fn proxies(&self) -> impl Iterator<Item = &Proxy> {
        [Some(&self.value), self.name.as_ref(), self.tooltip.as_ref()]
            .into_iter()
            .flatten()
            .chain([&self.visible, &self.enabled])
            .chain(
                self.validator
                    .pipe()
                    .rules()
                    .iter()
                    .flat_map(|rule| rule.proxies()),
            )
    }

    /// Rebind every proxy to a new context pair
    pub fn set_binding_context(&self, binding: &BindingContext) {
        for proxy in self.proxies() {
            if !proxy.is_constant() {
                proxy.set_binding_context(binding.clone());
            }
        }
    }

    /// Release every subscription
    pub fn dispose(&self) {
        self.validator.dispose();
        for proxy in self.proxies() {
            proxy.dispose();
        }
    }

    fn text(&self, proxy: &Proxy) -> String {
        match proxy.value() {
            FormValue::String(text) => text,
            other => self.culture.format(&other),
        }
    }
}

/// Ordered set of compiled fields sharing one binding context
#[derive(Debug, Clone)]
pub struct CompiledForm {
    pub(crate) fields: IndexMap<String, CompiledField>,
    pub(crate) binding: BindingContext,
}

impl CompiledForm {
    /// Field by key
    pub fn field(&self, key: &str) -> Option<&CompiledField> {
        self.fields.get(key)
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &CompiledField> {
        self.fields.values()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the form has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether every field validates
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(CompiledField::is_valid)
    }

    /// Re-validate every field; returns the failing ones by key
    pub fn validate(&self) -> IndexMap<String, ValidationResult> {
        self.fields
            .iter()
            .filter_map(|(key, field)| {
                let result = field.validator.validate();
                (!result.is_valid).then(|| (key.clone(), result))
            })
            .collect()
    }

    /// Current context pair
    pub fn binding_context(&self) -> &BindingContext {
        &self.binding
    }

    /// Rebind every field to a new model
    pub fn set_model<M: DataContext + 'static>(&mut self, model: &Rc<M>) {
        let binding = self.binding.clone().with_model(model);
        self.set_binding_context(binding);
    }

    /// Rebind every field to a new ambient context
    pub fn set_context<C: DataContext + 'static>(&mut self, context: &Rc<C>) {
        let binding = self.binding.clone().with_context(context);
        self.set_binding_context(binding);
    }

    /// Rebind every field to a new context pair
    pub fn set_binding_context(&mut self, binding: BindingContext) {
        for field in self.fields.values() {
            field.set_binding_context(&binding);
        }
        self.binding = binding;
    }

    /// Release every subscription of every field
    pub fn dispose(&self) {
        for field in self.fields.values() {
            field.dispose();
        }
    }
}
