use crate::domain::ports::DecodedObject;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeKind {
    Numeric,
    Nominal(Vec<String>),
    Text,
    Date(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    pub fn nominal<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal(values.into_iter().map(Into::into).collect()),
        }
    }
}

/// 資料集的結構描述（ARFF 標頭），通常與模型一起存放
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetHeader {
    pub relation: String,
    pub attributes: Vec<Attribute>,
}

impl DatasetHeader {
    pub fn new(relation: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            relation: relation.into(),
            attributes,
        }
    }
}

fn quote(name: &str) -> String {
    let needs_quotes = name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '{' | '}' | '%' | '\'' | '"'));
    if needs_quotes {
        format!("'{}'", name.replace('\'', "\\'"))
    } else {
        name.to_string()
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Numeric => f.write_str("numeric"),
            AttributeKind::Text => f.write_str("string"),
            AttributeKind::Date(format) => write!(f, "date {}", quote(format)),
            AttributeKind::Nominal(values) => {
                let values: Vec<String> = values.iter().map(|v| quote(v)).collect();
                write!(f, "{{{}}}", values.join(","))
            }
        }
    }
}

impl fmt::Display for DatasetHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@relation {}", quote(&self.relation))?;
        writeln!(f)?;
        for attribute in &self.attributes {
            writeln!(f, "@attribute {} {}", quote(&attribute.name), attribute.kind)?;
        }
        writeln!(f)?;
        write!(f, "@data")
    }
}

impl DecodedObject for DatasetHeader {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arff_header_layout() {
        let header = DatasetHeader::new(
            "weather",
            vec![
                Attribute::nominal("outlook", ["sunny", "overcast", "rainy"]),
                Attribute::numeric("humidity"),
                Attribute::nominal("play class", ["yes", "no"]),
            ],
        );

        assert_eq!(
            header.to_string(),
            "@relation weather\n\n\
             @attribute outlook {sunny,overcast,rainy}\n\
             @attribute humidity numeric\n\
             @attribute 'play class' {yes,no}\n\n\
             @data"
        );
    }

    #[test]
    fn test_date_and_text_attributes() {
        let header = DatasetHeader::new(
            "log entries",
            vec![
                Attribute {
                    name: "when".to_string(),
                    kind: AttributeKind::Date("yyyy-MM-dd HH:mm".to_string()),
                },
                Attribute {
                    name: "message".to_string(),
                    kind: AttributeKind::Text,
                },
            ],
        );

        let text = header.to_string();
        assert!(text.starts_with("@relation 'log entries'\n"));
        assert!(text.contains("@attribute when date 'yyyy-MM-dd HH:mm'\n"));
        assert!(text.contains("@attribute message string\n"));
    }
}
