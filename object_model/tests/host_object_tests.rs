// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{cell::RefCell, rc::Rc};

use ecmascript_object_model::ecmascript::{
    abstract_operations::operations_on_objects::{
        create_data_property_or_throw, define_property_or_throw, delete_property, get,
        has_property, own_keys, prevent_extensions, set,
    },
    builtins::{
        ForInIterator, HostObjectAdapter, create_host_object, create_lazy_object,
        ordinary_object_create_with_intrinsics, ordinary_object_create_with_prototype,
    },
    execution::{Agent, JsResult, Options},
    types::{BackendKind, InternalMethods, Object, PropertyDescriptor, PropertyKey, Value},
};

/// A record of plain data fields. Only writable, enumerable, configurable
/// data properties can be stored.
#[derive(Default)]
struct Record {
    fields: RefCell<Vec<(PropertyKey, Value)>>,
}

impl HostObjectAdapter for Record {
    fn get_own_property(
        &self,
        _: &mut Agent,
        key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        Ok(self
            .fields
            .borrow()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| PropertyDescriptor {
                value: Some(*value),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(true),
                ..Default::default()
            }))
    }

    fn define_own_property(
        &self,
        _: &mut Agent,
        key: PropertyKey,
        descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        if descriptor.is_accessor_descriptor()
            || [
                descriptor.writable,
                descriptor.enumerable,
                descriptor.configurable,
            ]
            .contains(&Some(false))
        {
            return Ok(false);
        }
        let mut fields = self.fields.borrow_mut();
        let value = descriptor.value.unwrap_or(Value::Undefined);
        match fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => {
                if descriptor.value.is_some() {
                    *slot = value;
                }
            }
            None => fields.push((key, value)),
        }
        Ok(true)
    }

    fn delete(&self, _: &mut Agent, key: PropertyKey) -> JsResult<bool> {
        self.fields.borrow_mut().retain(|(k, _)| *k != key);
        Ok(true)
    }

    fn own_property_keys(&self, _: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        Ok(self.fields.borrow().iter().map(|(k, _)| *k).collect())
    }
}

#[test]
fn host_object_reads_and_writes_through_adapter() {
    let mut agent = Agent::new(Options::default());
    let record = Rc::new(Record::default());
    let prototype = ordinary_object_create_with_intrinsics(&mut agent);
    let object = create_host_object(&mut agent, Some(prototype), record.clone());
    assert_eq!(object.backend_kind(&agent), BackendKind::Host);

    let name = PropertyKey::from_str(&mut agent, "name");
    let inherited = PropertyKey::from_str(&mut agent, "inherited");
    set(&mut agent, object, name, 1.into(), true).unwrap();
    set(&mut agent, prototype, inherited, 2.into(), true).unwrap();
    assert_eq!(record.fields.borrow().as_slice(), [(name, Value::from(1))]);
    assert_eq!(get(&mut agent, object, name).unwrap(), Value::from(1));
    assert_eq!(get(&mut agent, object, inherited).unwrap(), Value::from(2));
    assert!(has_property(&mut agent, object, inherited).unwrap());
    assert_eq!(own_keys(&mut agent, object, true).unwrap(), vec![name]);

    let keys = ForInIterator::new(object).collect_keys(&mut agent).unwrap();
    assert_eq!(keys, vec![name, inherited]);

    assert!(delete_property(&mut agent, object, name, true).unwrap());
    assert!(record.fields.borrow().is_empty());
}

#[test]
fn host_storage_limits_are_reported_as_failures() {
    let mut agent = Agent::new(Options::default());
    let object = create_host_object(&mut agent, None, Rc::new(Record::default()));
    let key = PropertyKey::from_str(&mut agent, "locked");
    let result = define_property_or_throw(
        &mut agent,
        object,
        key,
        PropertyDescriptor::new_frozen_data_descriptor(1),
    );
    assert!(result.is_err());
    assert!(!has_property(&mut agent, object, key).unwrap());
}

#[test]
fn non_extensible_host_object_rejects_new_keys() {
    let mut agent = Agent::new(Options::default());
    let object = create_host_object(&mut agent, None, Rc::new(Record::default()));
    let existing = PropertyKey::from_str(&mut agent, "existing");
    let fresh = PropertyKey::from_str(&mut agent, "fresh");
    set(&mut agent, object, existing, 1.into(), true).unwrap();
    prevent_extensions(&mut agent, object, true).unwrap();
    assert!(!object.internal_is_extensible(&mut agent).unwrap());
    assert!(!set(&mut agent, object, fresh, 1.into(), false).unwrap());
    assert!(set(&mut agent, object, existing, 2.into(), false).unwrap());
    assert_eq!(get(&mut agent, object, existing).unwrap(), Value::from(2));
}

fn populate(agent: &mut Agent, object: Object) -> JsResult<()> {
    let count = PropertyKey::from_str(agent, "count");
    let previous = get(agent, object, count)?;
    let next = match previous {
        Value::Number(n) => n + 1.0,
        _ => 1.0,
    };
    create_data_property_or_throw(agent, object, count, next.into())
}

#[test]
fn lazy_object_initializes_once() {
    let mut agent = Agent::new(Options::default());
    let prototype = ordinary_object_create_with_prototype(&mut agent, None);
    let object = create_lazy_object(&mut agent, Some(prototype), populate);
    assert_eq!(object.backend_kind(&agent), BackendKind::Lazy);

    assert_eq!(
        object.internal_get_prototype_of(&mut agent).unwrap(),
        Some(prototype)
    );
    assert_eq!(object.backend_kind(&agent), BackendKind::Ordinary);
    let count = PropertyKey::from_str(&mut agent, "count");
    assert_eq!(get(&mut agent, object, count).unwrap(), Value::from(1));
    assert_eq!(get(&mut agent, object, count).unwrap(), Value::from(1));
}
