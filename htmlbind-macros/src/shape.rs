use quote::ToTokens;
use syn::{GenericArgument, PathArguments, Type};

/// Declared shape of a record field, decided from its written type.
pub(crate) enum FieldShape {
    Text,
    TextSequence,
    Record,
    /// `Option<T>` or `Option<Box<T>>`, carrying `T`.
    Reference(Type),
    Unsupported(Mismatch),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mismatch {
    Field,
    SequenceElement,
    ReferenceTarget,
}

const PRIMITIVES: &[&str] = &[
    "bool", "char", "str", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
    "u128", "usize", "f32", "f64",
];

const COLLECTIONS: &[&str] = &[
    "HashMap",
    "BTreeMap",
    "HashSet",
    "BTreeSet",
    "VecDeque",
    "LinkedList",
    "BinaryHeap",
];

// Standard wrappers and owned types that look like records by name alone.
const WRAPPERS: &[&str] = &[
    "Rc", "Arc", "Cow", "Cell", "RefCell", "Mutex", "RwLock", "PathBuf", "Path", "OsString",
    "CString",
];

pub(crate) fn classify(ty: &Type) -> FieldShape {
    let path = match strip(ty) {
        Type::Path(type_path) => &type_path.path,
        _ => return FieldShape::Unsupported(Mismatch::Field),
    };
    let Some(last) = path.segments.last() else {
        return FieldShape::Unsupported(Mismatch::Field);
    };
    let argument = single_argument(&last.arguments);

    match last.ident.to_string().as_str() {
        "String" => FieldShape::Text,
        "Vec" => match argument {
            Some(element) if matches!(classify(element), FieldShape::Text) => FieldShape::TextSequence,
            _ => FieldShape::Unsupported(Mismatch::SequenceElement),
        },
        "Option" => match argument {
            Some(inner) => reference(inner),
            None => FieldShape::Unsupported(Mismatch::Field),
        },
        "Box" => FieldShape::Unsupported(Mismatch::Field),
        name if PRIMITIVES.contains(&name)
            || COLLECTIONS.contains(&name)
            || WRAPPERS.contains(&name) =>
        {
            FieldShape::Unsupported(Mismatch::Field)
        }
        _ => FieldShape::Record,
    }
}

fn reference(inner: &Type) -> FieldShape {
    let target = boxed(inner).unwrap_or(inner);
    match classify(target) {
        FieldShape::Record => FieldShape::Reference(target.clone()),
        _ => FieldShape::Unsupported(Mismatch::ReferenceTarget),
    }
}

fn boxed(ty: &Type) -> Option<&Type> {
    match strip(ty) {
        Type::Path(type_path) => {
            let last = type_path.path.segments.last()?;
            if last.ident == "Box" {
                single_argument(&last.arguments)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn single_argument(arguments: &PathArguments) -> Option<&Type> {
    match arguments {
        PathArguments::AngleBracketed(angle) if angle.args.len() == 1 => match angle.args.first() {
            Some(GenericArgument::Type(ty)) => Some(ty),
            _ => None,
        },
        _ => None,
    }
}

/// The type as written, without the token spacing of `to_string`.
pub(crate) fn display_type(ty: &Type) -> String {
    let spaced = ty.to_token_stream().to_string();
    let mut out = String::with_capacity(spaced.len());
    let mut chars = spaced.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ' ' {
            let before = out.chars().last();
            let after = chars.peek().copied();
            let tight = matches!(before, Some('<' | '&' | ':' | '(' | '['))
                || matches!(after, Some('<' | '>' | ':' | ',' | ';' | ')' | ']'));
            if tight {
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn strip(ty: &Type) -> &Type {
    match ty {
        Type::Paren(paren) => strip(&paren.elem),
        Type::Group(group) => strip(&group.elem),
        ty => ty,
    }
}
