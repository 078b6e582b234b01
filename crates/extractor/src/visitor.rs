use crate::config::{AccessorPattern, ExtractorConfig};
use crate::literal::{self, Literal};
use crate::types::{CallSite, DefaultValue};
use tree_sitter::{Node, Tree};

/// Builtins whose wrapping call says what the variable is converted to
const CAST_BUILTINS: &[&str] = &["int", "float", "bool", "str"];

/// Walks a parsed module and collects accessor call sites
pub(crate) struct AccessorVisitor<'a> {
    config: &'a ExtractorConfig,
    source: &'a str,
    sites: Vec<CallSite>,
}

impl<'a> AccessorVisitor<'a> {
    pub(crate) fn new(config: &'a ExtractorConfig, source: &'a str) -> Self {
        Self {
            config,
            source,
            sites: Vec::new(),
        }
    }

    /// Pre-order walk, so sites come out in source order and an outer call
    /// is reported before calls nested in its arguments.
    pub(crate) fn visit(mut self, tree: &Tree) -> Vec<CallSite> {
        let mut cursor = tree.walk();
        loop {
            let node = cursor.node();
            if node.kind() == "call" {
                if let Some(site) = self.visit_call(node) {
                    self.sites.push(site);
                }
            }

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return self.sites;
                }
            }
        }
    }

    fn visit_call(&self, call: Node<'_>) -> Option<CallSite> {
        let callee = self.dotted_path(call.child_by_field_name("function")?)?;
        let pattern = self.config.accessor_for(&callee)?;
        let line = call.start_position().row + 1;

        let arguments = call.child_by_field_name("arguments")?;
        if arguments.kind() != "argument_list" {
            return None;
        }
        let args = CallArguments::collect(arguments, self.source);

        let Some(name_node) = args.get(
            Some(pattern.name_position),
            pattern.name_keyword.as_deref(),
        ) else {
            log::debug!("line {line}: {callee} call without a name argument, skipped");
            return None;
        };
        let Some(name) = literal::plain_string(name_node, self.source).filter(|n| !n.is_empty())
        else {
            log::debug!("line {line}: {callee} call with a computed name, skipped");
            return None;
        };

        let (has_default, default_value, mut inferred_type) = match self.default_node(&args, pattern)
        {
            None => (false, None, None),
            Some(node) => match literal::evaluate(node, self.source) {
                Literal::Value(value) => {
                    let type_name = value.type_name().to_string();
                    (true, Some(value), Some(type_name))
                }
                Literal::Null => (true, None, None),
                Literal::Opaque(text) => {
                    let type_name = literal::numeric_type(node, self.source).map(str::to_string);
                    (true, Some(DefaultValue::Text(text)), type_name)
                }
            },
        };

        if inferred_type.is_none() && self.config.infer_from_annotations {
            inferred_type = self.annotation_type(call);
        }
        if inferred_type.is_none() && self.config.infer_from_casts {
            inferred_type = self.cast_type(call);
        }

        Some(CallSite {
            name,
            has_default,
            default_value,
            inferred_type,
            line,
        })
    }

    fn default_node<'t>(
        &self,
        args: &CallArguments<'t>,
        pattern: &AccessorPattern,
    ) -> Option<Node<'t>> {
        if pattern.default_position.is_none() && pattern.default_keyword.is_none() {
            return None;
        }
        args.get(pattern.default_position, pattern.default_keyword.as_deref())
    }

    /// `os.environ.get` for an attribute chain; `None` for anything computed
    fn dotted_path(&self, node: Node<'_>) -> Option<String> {
        match node.kind() {
            "identifier" => Some(self.text(node).to_string()),
            "attribute" => {
                let object = self.dotted_path(node.child_by_field_name("object")?)?;
                let attribute = node.child_by_field_name("attribute")?;
                Some(format!("{object}.{}", self.text(attribute)))
            }
            _ => None,
        }
    }

    /// `PORT: Optional[int] = os.getenv("PORT")` → `int`
    fn annotation_type(&self, call: Node<'_>) -> Option<String> {
        let assignment = call.parent()?;
        if assignment.kind() != "assignment" || assignment.child_by_field_name("right")? != call {
            return None;
        }
        let annotation = assignment.child_by_field_name("type")?;
        normalize_annotation(self.text(annotation))
    }

    /// `int(os.getenv("WORKERS", "4"))` → `int`
    fn cast_type(&self, call: Node<'_>) -> Option<String> {
        let argument_list = call.parent()?;
        if argument_list.kind() != "argument_list" {
            return None;
        }
        let outer = argument_list.parent()?;
        if outer.kind() != "call" {
            return None;
        }
        let function = outer.child_by_field_name("function")?;
        if function.kind() != "identifier" {
            return None;
        }
        let builtin = self.text(function);
        if !CAST_BUILTINS.contains(&builtin) {
            return None;
        }
        let args = CallArguments::collect(argument_list, self.source);
        (args.positional.first() == Some(&call)).then(|| builtin.to_string())
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        &self.source[node.byte_range()]
    }
}

/// Arguments of one call, split by how they were passed
struct CallArguments<'t> {
    positional: Vec<Node<'t>>,
    keywords: Vec<(String, Node<'t>)>,
}

impl<'t> CallArguments<'t> {
    fn collect(list: Node<'t>, source: &str) -> Self {
        let mut positional = Vec::new();
        let mut keywords = Vec::new();
        // Positions after `*args` are unknowable
        let mut splatted = false;

        let mut cursor = list.walk();
        for child in list.named_children(&mut cursor) {
            match child.kind() {
                "comment" | "dictionary_splat" => {}
                "list_splat" => splatted = true,
                "keyword_argument" => {
                    if let (Some(name), Some(value)) = (
                        child.child_by_field_name("name"),
                        child.child_by_field_name("value"),
                    ) {
                        keywords.push((source[name.byte_range()].to_string(), value));
                    }
                }
                _ if !splatted => positional.push(child),
                _ => {}
            }
        }

        Self {
            positional,
            keywords,
        }
    }

    fn get(&self, position: Option<usize>, keyword: Option<&str>) -> Option<Node<'t>> {
        position
            .and_then(|index| self.positional.get(index).copied())
            .or_else(|| {
                let keyword = keyword?;
                self.keywords
                    .iter()
                    .find(|(name, _)| name == keyword)
                    .map(|(_, value)| *value)
            })
    }
}

/// Reduce an annotation to a type tag.
///
/// `Optional[X]` and `X | None` become `X`, unions become `Union[A, B]`,
/// other generics collapse to `Base[...]`.
pub(crate) fn normalize_annotation(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.trim_matches(|c| c == '"' || c == '\'');
    if compact.is_empty() {
        return None;
    }

    let alternatives = split_top_level(compact, '|');
    if alternatives.len() > 1 {
        return union_of(&alternatives);
    }

    let Some(open) = compact.find('[') else {
        return Some(last_segment(compact).to_string());
    };
    if !compact.ends_with(']') {
        return None;
    }
    let base = last_segment(&compact[..open]);
    let inner = &compact[open + 1..compact.len() - 1];
    match base {
        "Optional" => normalize_annotation(inner),
        "Union" => union_of(&split_top_level(inner, ',')),
        _ => Some(format!("{base}[...]")),
    }
}

fn union_of(members: &[&str]) -> Option<String> {
    let members: Vec<String> = members
        .iter()
        .filter(|member| **member != "None")
        .filter_map(|member| normalize_annotation(member))
        .collect();
    match members.len() {
        0 => None,
        1 => members.into_iter().next(),
        _ => Some(format!("Union[{}]", members.join(", "))),
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

fn split_top_level(value: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in value.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&value[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts.into_iter().filter(|part| !part.is_empty()).collect()
}
