//! Hint formatting for diagnostics and debugging.

use std::fmt::Write;

use crate::{ClassId, HintData, HintId, HintPool};

impl HintPool {
    /// Format a hint as it would be written in source.
    pub fn format_hint(&self, id: HintId) -> String {
        let mut buf = String::new();
        self.format_hint_into(id, &mut buf);
        buf
    }

    /// Format a hint into an existing string buffer.
    pub fn format_hint_into(&self, id: HintId, buf: &mut String) {
        match self.lookup(id) {
            HintData::Any => buf.push_str("Any"),
            HintData::Class(class) => self.format_class(class, buf),
            HintData::Exact(class) => {
                buf.push_str("Exact[");
                self.format_class(class, buf);
                buf.push(']');
            }

            HintData::Union(members) => self.format_list(&members, " | ", buf),

            HintData::List(elem) => self.format_subscript("list", &[elem], buf),
            HintData::Set(elem) => self.format_subscript("set", &[elem], buf),
            HintData::Collection { origin, elem } => {
                self.format_class(origin, buf);
                buf.push('[');
                self.format_hint_into(elem, buf);
                buf.push(']');
            }
            HintData::VarTuple(elem) => {
                buf.push_str("tuple[");
                self.format_hint_into(elem, buf);
                buf.push_str(", ...]");
            }
            HintData::Tuple(items) if items.is_empty() => buf.push_str("tuple[()]"),
            HintData::Tuple(items) => self.format_subscript("tuple", &items, buf),
            HintData::Dict { key, value } => self.format_subscript("dict", &[key, value], buf),
            HintData::Mapping { origin, key, value } => {
                self.format_class(origin, buf);
                buf.push('[');
                self.format_list(&[key, value], ", ", buf);
                buf.push(']');
            }
            HintData::Generic { origin, args } => {
                self.format_class(origin, buf);
                if !args.is_empty() {
                    buf.push('[');
                    self.format_list(&args, ", ", buf);
                    buf.push(']');
                }
            }

            HintData::TypeVar { name, .. } => buf.push_str(&name),
            HintData::ForwardRef(name) => {
                let _ = write!(buf, "'{name}'");
            }
            HintData::Literal(values) => {
                buf.push_str("Literal[");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    let _ = write!(buf, "{value}");
                }
                buf.push(']');
            }
            HintData::Callable { params, ret } => {
                buf.push_str("Callable[");
                match params {
                    None => buf.push_str("..."),
                    Some(params) => {
                        buf.push('[');
                        self.format_list(&params, ", ", buf);
                        buf.push(']');
                    }
                }
                buf.push_str(", ");
                self.format_hint_into(ret, buf);
                buf.push(']');
            }
            HintData::Opaque(description) => {
                let _ = write!(buf, "<opaque: {description}>");
            }
        }
    }

    fn format_class(&self, class: ClassId, buf: &mut String) {
        if class == ClassId::NONE_TYPE {
            buf.push_str("None");
        } else {
            self.classes().write_name(class, buf);
        }
    }

    fn format_subscript(&self, head: &str, args: &[HintId], buf: &mut String) {
        buf.push_str(head);
        buf.push('[');
        self.format_list(args, ", ", buf);
        buf.push(']');
    }

    fn format_list(&self, ids: &[HintId], sep: &str, buf: &mut String) {
        for (i, &id) in ids.iter().enumerate() {
            if i > 0 {
                buf.push_str(sep);
            }
            self.format_hint_into(id, buf);
        }
    }
}
