//! A parsed template plus the data for rendering it once (or many
//! times, clearing in between).

use std::sync::Arc;

use kstring::KString;
use serde::Serialize;

use crate::{element::{Element, Fields, Partial, Template},
            data::{ViewData, TRUE, FALSE},
            bind::{Bindable, Binder, bind_serialize},
            render::{render, render_range, block_markup},
            error::{ViewError, ViewWarning}};


#[derive(Debug, Clone)]
pub struct View {
    template: Arc<Template>,
    data: ViewData,
    date_format: String,
}

impl View {
    pub fn new(template: Arc<Template>, date_format: String) -> Self {
        View {
            template,
            data: ViewData::new(),
            date_format,
        }
    }

    pub fn template(&self) -> &Arc<Template> {
        &self.template
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.data.set(key, value)
    }

    /// "" if not set.
    pub fn get(&self, key: &str) -> &str {
        self.data.get(key).unwrap_or("")
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Make the block `key` visible.
    pub fn show(&mut self, key: &str) {
        self.data.set(key, TRUE)
    }

    pub fn hide(&mut self, key: &str) {
        self.data.set(key, FALSE)
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.data.set_bool(key, value)
    }

    /// Drop all bound data, e.g. before rendering the next row.
    pub fn clear(&mut self) {
        self.data.clear()
    }

    pub fn data(&self) -> &ViewData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ViewData {
        &mut self.data
    }

    pub fn elements(&self) -> &[Element] {
        &self.template.elements
    }

    pub fn fields(&self) -> &Fields {
        &self.template.fields
    }

    pub fn field_indices(&self, name: &str) -> &[usize] {
        self.template.field_indices(name)
    }

    pub fn partials(&self) -> &[Partial] {
        &self.template.partials
    }

    pub fn warnings(&self) -> &[ViewWarning] {
        &self.template.warnings
    }

    pub fn render(&self) -> String {
        self.render_with(true)
    }

    /// With `hide_elements` false, unshown blocks stay in the output
    /// and tags without data are reproduced as written.
    pub fn render_with(&self, hide_elements: bool) -> String {
        render(&self.template.elements, &self.data, hide_elements)
    }

    pub fn render_passive(&self) -> String {
        self.render_with(false)
    }

    /// The template source of the block opened by element `index`
    /// (see `field_indices`), "" if that is not a block.
    pub fn get_block(&self, index: usize) -> String {
        block_markup(&self.template.elements, index)
    }

    /// The body of the first block named `name`, rendered with the
    /// current data regardless of whether the block itself is shown.
    pub fn block_content(&self, name: &str) -> String {
        let elements = &self.template.elements;
        let index = match self.template.find(name) {
            Some(i) => i,
            None => return String::new()
        };
        match elements[index].block_end {
            Some(end) => {
                let mut out = elements[index].html.clone();
                out.push_str(&render_range(elements, index + 1, end, &self.data, true));
                out
            }
            None => String::new()
        }
    }

    pub fn bind<B: Bindable + ?Sized>(&mut self, value: &B) {
        self.bind_as(value, "")
    }

    /// Bind with keys below `root` (`{{root.field}}`).
    pub fn bind_as<B: Bindable + ?Sized>(&mut self, value: &B, root: &str) {
        value.bind_fields(&mut Binder::new(&mut self.data, root, &self.date_format));
    }

    pub fn bind_serialize<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
        root: &str
    ) -> Result<(), ViewError> {
        bind_serialize(&mut self.data, root, &self.date_format, value)
    }

    /// Access to the variables of the partial included as `id`.
    pub fn child(&mut self, id: &str) -> ViewChild {
        let prefix = format!("{}-", id.to_lowercase());
        let fields = self.template.fields.iter()
            .filter_map(|(name, indices)| {
                let rest = name.strip_prefix(&*prefix)?;
                Some((KString::from_ref(rest), indices.clone()))
            })
            .collect();
        ViewChild {
            view: self,
            prefix,
            fields,
        }
    }
}


/// The data of a `View` seen from inside one of its partials: keys
/// get the partial's prefix prepended.
pub struct ViewChild<'v> {
    view: &'v mut View,
    prefix: String,
    fields: Fields,
}

impl<'v> ViewChild<'v> {
    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let key = self.key(key);
        self.view.set(&key, value)
    }

    pub fn get(&self, key: &str) -> &str {
        self.view.get(&self.key(key))
    }

    pub fn show(&mut self, key: &str) {
        let key = self.key(key);
        self.view.show(&key)
    }

    pub fn bind<B: Bindable + ?Sized>(&mut self, value: &B, root: &str) {
        let mut data = ViewData::new();
        value.bind_fields(&mut Binder::new(&mut data, root, &self.view.date_format));
        for (k, v) in &data {
            let key = self.key(k);
            self.view.set(&key, v.as_str());
        }
    }

    /// The partial's fields, names without the prefix; indices refer
    /// to the parent's elements.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;

    fn view(text: &str) -> View {
        View::new(Arc::new(parse_text(text)), crate::config::DEFAULT_DATE_FORMAT.into())
    }

    #[test]
    fn t_set_get() {
        let mut v = view("hi {{Name}}!");
        assert_eq!(v.get("name"), "");
        assert!(!v.contains_key("name"));
        v.set("NAME", "Sam");
        assert_eq!(v.get("Name"), "Sam");
        assert_eq!(v.render(), "hi Sam!");
        v.clear();
        assert_eq!(v.render(), "hi !");
        assert_eq!(v.field_indices("name"), &[1]);
    }

    #[test]
    fn t_show_hide() {
        let mut v = view("a{{x}}b{{/x}}c");
        assert_eq!(v.render(), "ac");
        v.show("X");
        assert_eq!(v.render(), "abc");
        assert_eq!(v.get("x"), "True");
        v.hide("x");
        assert_eq!(v.render(), "ac");
        v.set_bool("x", true);
        assert_eq!(v.render(), "abc");
        v.data_mut().remove("x");
        assert_eq!(v.render_passive(), "a{{x}}b{{/x}}c");
    }

    #[test]
    fn t_blocks() {
        let mut v = view("<ul>{{row}}<li>{{name}}</li>{{/row}}</ul>");
        let i = v.field_indices("row")[0];
        assert_eq!(v.get_block(i), "<li>{{name}}</li>");
        assert_eq!(v.get_block(0), "");
        v.set("name", "a");
        assert_eq!(v.block_content("row"), "<li>a</li>");
        assert_eq!(v.block_content("name"), "");
        assert_eq!(v.block_content("nope"), "");
        assert_eq!(v.render(), "<ul></ul>");
    }

    #[test]
    fn t_child() {
        let mut v = view("{{btn-title}}|{{btn-x}}{{/btn-x}}|{{other}}");
        {
            let mut c = v.child("Btn");
            let mut names: Vec<&str> = c.fields().keys().map(|k| k.as_str()).collect();
            names.sort();
            assert_eq!(names, vec!["title", "x"]);
            c.set("title", "Save");
            c.show("x");
            assert_eq!(c.get("title"), "Save");
        }
        assert_eq!(v.get("btn-title"), "Save");
        assert_eq!(v.get("btn-x"), "True");
        assert_eq!(v.render(), "Save||");
    }

    struct Item {
        name: &'static str,
        active: bool,
    }

    impl Bindable for Item {
        fn bind_fields(&self, b: &mut Binder) {
            b.field("name", self.name).field("active", &self.active);
        }
    }

    #[test]
    fn t_bind() {
        let mut v = view("{{name}}{{active}}*{{/active}} {{item.name}}");
        v.bind(&Item { name: "a", active: true });
        v.bind_as(&Item { name: "b", active: false }, "item");
        assert_eq!(v.render(), "a* b");

        let mut v = view("{{c-name}}{{c-item.name}}");
        {
            let mut c = v.child("c");
            c.bind(&Item { name: "x", active: true }, "");
            c.bind(&Item { name: "y", active: true }, "item");
        }
        assert_eq!(v.render(), "xy");
    }

    #[test]
    fn t_bind_serialize() {
        let mut v = view("{{title}} by {{author.name}}");
        v.bind_serialize(&serde_json::json!({
            "title": "Post", "author": {"name": "Kim"}
        }), "").unwrap();
        assert_eq!(v.render(), "Post by Kim");
        assert!(v.bind_serialize("text", "").is_err());
    }
}
