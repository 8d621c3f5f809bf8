//! Engine-wide properties object.
//!
//! The property set is fixed and enumerable at compile time; there is no
//! runtime registration step. The object stringifies to empty text instead
//! of concatenating children, and it is always truthy.

/// The fixed global property enumeration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum GlobalProperty {
    BaseUri,
    ClientType,
    UserAgent,
}

impl GlobalProperty {
    /// Every property, in enumeration order.
    pub const ALL: [GlobalProperty; 3] = [
        GlobalProperty::BaseUri,
        GlobalProperty::ClientType,
        GlobalProperty::UserAgent,
    ];

    /// Property name as seen from templates (`global.baseURI`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            GlobalProperty::BaseUri => "baseURI",
            GlobalProperty::ClientType => "clientType",
            GlobalProperty::UserAgent => "userAgent",
        }
    }

    /// Look a property up by its template-visible name.
    pub fn from_name(name: &str) -> Option<GlobalProperty> {
        GlobalProperty::ALL
            .into_iter()
            .find(|property| property.name() == name)
    }

    const fn slot(self) -> usize {
        match self {
            GlobalProperty::BaseUri => 0,
            GlobalProperty::ClientType => 1,
            GlobalProperty::UserAgent => 2,
        }
    }
}

/// The engine-wide properties container.
///
/// One copy lives on the engine as the configured defaults; every
/// evaluation works against its own shared handle, transiently overriding
/// the base URI around macro invocations, imports and includes.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct GlobalObject {
    slots: [Option<String>; 3],
}

impl GlobalObject {
    pub fn new() -> Self {
        GlobalObject::default()
    }

    pub fn get(&self, property: GlobalProperty) -> Option<&str> {
        self.slots[property.slot()].as_deref()
    }

    pub fn set(&mut self, property: GlobalProperty, value: Option<String>) {
        self.slots[property.slot()] = value;
    }

    pub fn base_uri(&self) -> Option<&str> {
        self.get(GlobalProperty::BaseUri)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_property_names_round_trip() {
        for property in GlobalProperty::ALL {
            assert_eq!(GlobalProperty::from_name(property.name()), Some(property));
        }
        assert_eq!(GlobalProperty::from_name("no-such-property"), None);
    }

    #[test]
    fn test_get_set() {
        let mut global = GlobalObject::new();
        assert_eq!(global.base_uri(), None);
        global.set(GlobalProperty::BaseUri, Some("file:///tpl/".to_string()));
        global.set(GlobalProperty::UserAgent, Some("weft".to_string()));
        assert_eq!(global.base_uri(), Some("file:///tpl/"));
        assert_eq!(global.get(GlobalProperty::UserAgent), Some("weft"));
        assert_eq!(global.get(GlobalProperty::ClientType), None);
    }
}
