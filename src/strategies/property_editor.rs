//! Opt-in fallback backed by an external editor registry.
//!
//! The registry is a host-side collaborator: given a target type it may hand
//! out a fresh editor that accepts text and yields a value.

use super::DynamicStrategy;
use crate::core::{BoxError, ConversionContext, ConversionError, ErrorKind, Probe, TypeDescriptor, Value};

use std::sync::Arc;

/// A stateful text-to-value editor for one target type.
pub trait PropertyEditor: Send {
    fn set_as_text(&mut self, text: &str) -> Result<(), BoxError>;

    /// The value set last; `None` if the editor holds no value.
    fn value(self: Box<Self>) -> Option<Value>;
}

/// Looks up editors by target type.
pub trait PropertyEditors: Send + Sync {
    fn find_editor(&self, descriptor: &TypeDescriptor) -> Option<Box<dyn PropertyEditor>>;
}

impl<F> PropertyEditors for F
where
    F: Fn(&TypeDescriptor) -> Option<Box<dyn PropertyEditor>> + Send + Sync,
{
    fn find_editor(&self, descriptor: &TypeDescriptor) -> Option<Box<dyn PropertyEditor>> {
        self(descriptor)
    }
}

pub struct PropertyEditorStrategy {
    editors: Arc<dyn PropertyEditors>,
}

impl PropertyEditorStrategy {
    pub fn new(editors: Arc<dyn PropertyEditors>) -> Self {
        Self { editors }
    }
}

impl DynamicStrategy for PropertyEditorStrategy {
    fn name(&self) -> &str {
        "property-editor"
    }

    fn applies_to(&self, descriptor: &TypeDescriptor, _probe: &Probe<'_>) -> Result<bool, ConversionError> {
        Ok(self.editors.find_editor(descriptor).is_some())
    }

    fn convert(&self, context: &ConversionContext<'_>) -> Result<Option<Value>, ConversionError> {
        let descriptor = context.descriptor();
        let mut editor = self
            .editors
            .find_editor(descriptor)
            .ok_or_else(|| ConversionError::no_strategy(descriptor))?;
        editor
            .set_as_text(context.input())
            .map_err(|cause| ConversionError::caused_by(ErrorKind::ConversionFailed, cause))?;
        Ok(editor.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConversionEngine, Convertible};

    #[derive(Debug, PartialEq)]
    struct Celsius(f64);

    impl Convertible for Celsius {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::scalar::<Celsius>()
        }
    }

    #[derive(Default)]
    struct CelsiusEditor(Option<Celsius>);

    impl PropertyEditor for CelsiusEditor {
        fn set_as_text(&mut self, text: &str) -> Result<(), BoxError> {
            let degrees = text.trim().trim_end_matches("C").parse::<f64>()?;
            self.0 = Some(Celsius(degrees));
            Ok(())
        }

        fn value(self: Box<Self>) -> Option<Value> {
            self.0.map(Value::new)
        }
    }

    fn editors(descriptor: &TypeDescriptor) -> Option<Box<dyn PropertyEditor>> {
        (*descriptor == Celsius::descriptor()).then(|| Box::new(CelsiusEditor::default()) as Box<dyn PropertyEditor>)
    }

    #[test]
    fn test_disabled_by_default() {
        let engine = ConversionEngine::default();
        let error = engine.convert::<Celsius>("21C").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NoStrategyFound);
    }

    #[test]
    fn test_editor_converts_when_enabled() {
        let engine = ConversionEngine::builder()
            .enable_property_editors(editors)
            .build()
            .unwrap();
        assert!(engine.is_convertible::<Celsius>());
        assert_eq!(engine.convert::<Celsius>("21.5C").unwrap(), Some(Celsius(21.5)));

        let error = engine.convert::<Celsius>("warm").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ConversionFailed);
    }
}
