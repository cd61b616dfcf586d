//! Model with two color properties decoded from hex strings.

use json_model::{
    ConfigurationError, DescriptorBuilder, FieldError, Fields, JsonModel, ModelDescriptor,
    TransformerRef,
};

use crate::color::PlatformColor;
use crate::transformers::color_property_type;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomPropertyModel {
    pub red_color: PlatformColor,
    pub blue_color: PlatformColor,
}

impl JsonModel for CustomPropertyModel {
    fn describe() -> Result<ModelDescriptor, ConfigurationError> {
        let mut b = DescriptorBuilder::new("CustomPropertyModel");
        b.declare_property("redColor", color_property_type(), Some(TransformerRef::STRING))?
            .declare_property("blueColor", color_property_type(), Some(TransformerRef::STRING))?;
        b.build()
    }

    fn from_fields(fields: &mut Fields) -> Result<Self, FieldError> {
        Ok(Self {
            red_color: fields.take("redColor")?,
            blue_color: fields.take("blueColor")?,
        })
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields
            .insert("redColor", self.red_color)
            .insert("blueColor", self.blue_color);
        fields
    }
}
