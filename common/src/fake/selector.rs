// a small subset of css selectors, enough for the markup hooks the controllers look up:
// comma-separated groups of descendant chains, each step made of an optional tag plus any
// number of #id, .class, [attr] and [attr^="prefix"] filters

#[derive(Clone, Debug, PartialEq)]
pub struct SelectorList(pub Vec<Chain>);

// compounds ordered outermost first; each must match an ancestor of the next
#[derive(Clone, Debug, PartialEq)]
pub struct Chain(pub Vec<Compound>);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeFilter>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeFilter {
    Present(String),
    Equals(String, String),
    Prefix(String, String),
}

impl SelectorList {
    pub fn parse(selector: &str) -> Self {
        let chains = selector
            .split(',')
            .map(str::trim)
            .filter(|group| !group.is_empty())
            .map(|group| Chain(group.split_whitespace().map(Compound::parse).collect()))
            .collect();

        SelectorList(chains)
    }
}

impl Compound {
    pub fn parse(text: &str) -> Self {
        let mut compound = Compound::default();
        let mut rest = text;

        let tag_len = rest
            .find(|c: char| matches!(c, '#' | '.' | '['))
            .unwrap_or(rest.len());
        if tag_len > 0 && &rest[..tag_len] != "*" {
            compound.tag = Some(rest[..tag_len].to_ascii_lowercase());
        }
        rest = &rest[tag_len..];

        while let Some(marker) = rest.chars().next() {
            rest = &rest[1..];
            match marker {
                '[' => {
                    let end = rest.find(']').unwrap_or(rest.len());
                    compound.attributes.push(AttributeFilter::parse(&rest[..end]));
                    rest = rest.get(end + 1..).unwrap_or("");
                }
                _ => {
                    let end = rest
                        .find(|c: char| matches!(c, '#' | '.' | '['))
                        .unwrap_or(rest.len());
                    let name = rest[..end].to_owned();
                    if marker == '#' {
                        compound.id = Some(name);
                    } else {
                        compound.classes.push(name);
                    }
                    rest = &rest[end..];
                }
            }
        }

        compound
    }
}

impl AttributeFilter {
    fn parse(body: &str) -> Self {
        let unquote = |value: &str| value.trim().trim_matches(|c: char| c == '"' || c == '\'').to_owned();

        if let Some((name, value)) = body.split_once("^=") {
            AttributeFilter::Prefix(name.trim().to_owned(), unquote(value))
        } else if let Some((name, value)) = body.split_once('=') {
            AttributeFilter::Equals(name.trim().to_owned(), unquote(value))
        } else {
            AttributeFilter::Present(body.trim().to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_groups_and_descendants() {
        let list = SelectorList::parse(".nav-menu a, img[data-src]");

        assert_eq!(list.0.len(), 2);
        assert_eq!(list.0[0].0.len(), 2);
        assert_eq!(list.0[0].0[0].classes, vec!["nav-menu".to_owned()]);
        assert_eq!(list.0[0].0[1].tag.as_deref(), Some("a"));
        assert_eq!(
            list.0[1].0[0].attributes,
            vec![AttributeFilter::Present("data-src".to_owned())]
        );
    }

    #[test]
    fn parses_attribute_values_with_dots() {
        let compound = Compound::parse("a[href=products.html]");

        assert_eq!(compound.tag.as_deref(), Some("a"));
        assert!(compound.classes.is_empty());
        assert_eq!(
            compound.attributes,
            vec![AttributeFilter::Equals("href".to_owned(), "products.html".to_owned())]
        );
    }

    #[test]
    fn parses_prefix_attribute_and_id() {
        let compound = Compound::parse(r##"a#top.btn[href^="#"]"##);

        assert_eq!(compound.tag.as_deref(), Some("a"));
        assert_eq!(compound.id.as_deref(), Some("top"));
        assert_eq!(compound.classes, vec!["btn".to_owned()]);
        assert_eq!(
            compound.attributes,
            vec![AttributeFilter::Prefix("href".to_owned(), "#".to_owned())]
        );
    }
}
