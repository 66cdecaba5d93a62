use syn::{Attribute, Error, ExprPath, LitStr, Token};

pub enum DefaultDefinition {
    Default,
    Expr(ExprPath),
}

#[derive(Default)]
pub struct FieldAttributes {
    pub default: Option<DefaultDefinition>,
    pub dependency: Option<LitStr>,
    pub is_value: bool,
    pub is_optional: bool,
}

impl FieldAttributes {
    /// Parses and merges all given `#[constructible]` attributes.
    pub fn from_attributes<'a, I: IntoIterator<Item = &'a Attribute>>(
        attributes: I,
    ) -> Result<Self, Error> {
        let mut result = Self::default();
        for attribute in attributes {
            result.parse(attribute)?;
        }

        Ok(result)
    }

    fn parse(&mut self, attribute: &Attribute) -> Result<(), Error> {
        attribute.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                if meta.input.peek(Token![=]) {
                    let value = meta.value()?;
                    let expr: LitStr = value.parse()?;
                    self.default = Some(DefaultDefinition::Expr(expr.parse()?));
                } else {
                    self.default = Some(DefaultDefinition::Default);
                }
            } else if meta.path.is_ident("dependency") {
                self.dependency = Some(meta.value().and_then(|value| value.parse())?);
            } else if meta.path.is_ident("value") {
                self.is_value = true;
            } else if meta.path.is_ident("optional") {
                self.is_optional = true;
            } else {
                return Err(meta.error("Unsupported constructible field attribute!"));
            }

            Ok(())
        })
    }
}

#[derive(Default)]
pub struct ConstructibleAttributes {
    pub name: Option<LitStr>,
    pub methods: Option<ExprPath>,
}

impl TryFrom<&Attribute> for ConstructibleAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut name = None;
        let mut methods = None;
        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value().and_then(|value| value.parse())?);
            } else if meta.path.is_ident("methods") {
                let expr: LitStr = meta.value().and_then(|value| value.parse())?;
                methods = Some(expr.parse()?);
            } else {
                return Err(meta.error("Unsupported constructible attribute!"));
            }

            Ok(())
        })?;

        Ok(Self { name, methods })
    }
}
