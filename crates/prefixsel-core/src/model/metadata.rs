//! Names and per-variable annotations.
//!
//! All three maps are allocated lazily; a model nobody labels carries none.

use std::collections::BTreeMap;

use prefixsel_expr::{ConstraintId, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;

fn lazy_insert<K: Ord, V>(slot: &mut Option<BTreeMap<K, V>>, key: K, value: V) {
    slot.get_or_insert_with(BTreeMap::new).insert(key, value);
}

impl Model {
    pub fn set_variable_name(
        &mut self,
        id: VariableId,
        name: impl Into<String>,
    ) -> Result<(), ModelError> {
        self.ensure_variable_exists(id)?;
        lazy_insert(&mut self.variable_names, id, name.into());
        Ok(())
    }

    pub fn get_variable_name(&self, id: VariableId) -> Option<&str> {
        self.variable_names.as_ref()?.get(&id).map(String::as_str)
    }

    /// Attach free-form JSON to a variable, replacing any earlier value.
    pub fn set_variable_metadata(
        &mut self,
        id: VariableId,
        metadata: serde_json::Value,
    ) -> Result<(), ModelError> {
        self.ensure_variable_exists(id)?;
        lazy_insert(&mut self.variable_metadata, id, metadata);
        Ok(())
    }

    pub fn get_variable_metadata(&self, id: VariableId) -> Option<&serde_json::Value> {
        self.variable_metadata.as_ref()?.get(&id)
    }

    pub fn set_constraint_name(
        &mut self,
        id: ConstraintId,
        name: impl Into<String>,
    ) -> Result<(), ModelError> {
        self.ensure_constraint_exists(id)?;
        lazy_insert(&mut self.constraint_names, id, name.into());
        Ok(())
    }

    pub fn get_constraint_name(&self, id: ConstraintId) -> Option<&str> {
        self.constraint_names.as_ref()?.get(&id).map(String::as_str)
    }

    /// Every constraint carrying `name`, in id order. A constraint family
    /// such as the per-row monotonic rows shares one name.
    pub fn constraints_named(&self, name: &str) -> Vec<ConstraintId> {
        let Some(names) = &self.constraint_names else {
            return Vec::new();
        };
        names
            .iter()
            .filter_map(|(id, label)| (label == name).then_some(*id))
            .collect()
    }
}
