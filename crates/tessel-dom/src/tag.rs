//! Element tag table
//!
//! Closed set of recognised tags. Anything else maps to [`Tag::Unknown`].

/// Element tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// Pre-existing document root
    Root = 0,
    /// Text node
    Text,
    /// Unrecognised tag name
    Unknown,

    // Document structure
    Html,
    Head,
    Body,
    Title,
    Meta,
    Link,
    Style,
    Script,

    // Sectioning
    Div,
    Section,
    Article,
    Header,
    Footer,
    Nav,
    Main,
    Aside,

    // Text blocks
    P,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Pre,
    Blockquote,
    Hr,

    // Lists
    Ul,
    Ol,
    Li,

    // Inline
    Span,
    A,
    Strong,
    Em,
    B,
    I,
    U,
    Code,
    Br,
    Img,

    // Forms
    Form,
    Label,
    Button,
    Input,
    Textarea,
    Select,
    Option,

    // Tables
    Table,
    Thead,
    Tbody,
    Tr,
    Td,
    Th,

    // Embedded
    Canvas,
    Video,
}

impl Tag {
    /// Every tag, indexed by its wire value
    pub const ALL: [Tag; 57] = [
        Tag::Root, Tag::Text, Tag::Unknown,
        Tag::Html, Tag::Head, Tag::Body, Tag::Title, Tag::Meta, Tag::Link, Tag::Style, Tag::Script,
        Tag::Div, Tag::Section, Tag::Article, Tag::Header, Tag::Footer, Tag::Nav, Tag::Main, Tag::Aside,
        Tag::P, Tag::H1, Tag::H2, Tag::H3, Tag::H4, Tag::H5, Tag::H6, Tag::Pre, Tag::Blockquote, Tag::Hr,
        Tag::Ul, Tag::Ol, Tag::Li,
        Tag::Span, Tag::A, Tag::Strong, Tag::Em, Tag::B, Tag::I, Tag::U, Tag::Code, Tag::Br, Tag::Img,
        Tag::Form, Tag::Label, Tag::Button, Tag::Input, Tag::Textarea, Tag::Select, Tag::Option,
        Tag::Table, Tag::Thead, Tag::Tbody, Tag::Tr, Tag::Td, Tag::Th,
        Tag::Canvas, Tag::Video,
    ];

    /// Map an element name to a tag (ASCII case-insensitive).
    ///
    /// Names outside the table map to `Unknown`; the root and text
    /// sentinels are never produced here.
    pub fn from_name(name: &str) -> Tag {
        match name.to_ascii_lowercase().as_str() {
            "html" => Tag::Html,
            "head" => Tag::Head,
            "body" => Tag::Body,
            "title" => Tag::Title,
            "meta" => Tag::Meta,
            "link" => Tag::Link,
            "style" => Tag::Style,
            "script" => Tag::Script,
            "div" => Tag::Div,
            "section" => Tag::Section,
            "article" => Tag::Article,
            "header" => Tag::Header,
            "footer" => Tag::Footer,
            "nav" => Tag::Nav,
            "main" => Tag::Main,
            "aside" => Tag::Aside,
            "p" => Tag::P,
            "h1" => Tag::H1,
            "h2" => Tag::H2,
            "h3" => Tag::H3,
            "h4" => Tag::H4,
            "h5" => Tag::H5,
            "h6" => Tag::H6,
            "pre" => Tag::Pre,
            "blockquote" => Tag::Blockquote,
            "hr" => Tag::Hr,
            "ul" => Tag::Ul,
            "ol" => Tag::Ol,
            "li" => Tag::Li,
            "span" => Tag::Span,
            "a" => Tag::A,
            "strong" => Tag::Strong,
            "em" => Tag::Em,
            "b" => Tag::B,
            "i" => Tag::I,
            "u" => Tag::U,
            "code" => Tag::Code,
            "br" => Tag::Br,
            "img" => Tag::Img,
            "form" => Tag::Form,
            "label" => Tag::Label,
            "button" => Tag::Button,
            "input" => Tag::Input,
            "textarea" => Tag::Textarea,
            "select" => Tag::Select,
            "option" => Tag::Option,
            "table" => Tag::Table,
            "thead" => Tag::Thead,
            "tbody" => Tag::Tbody,
            "tr" => Tag::Tr,
            "td" => Tag::Td,
            "th" => Tag::Th,
            "canvas" => Tag::Canvas,
            "video" => Tag::Video,
            _ => Tag::Unknown,
        }
    }

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Tag::Root => "#root",
            Tag::Text => "#text",
            Tag::Unknown => "#unknown",
            Tag::Html => "html",
            Tag::Head => "head",
            Tag::Body => "body",
            Tag::Title => "title",
            Tag::Meta => "meta",
            Tag::Link => "link",
            Tag::Style => "style",
            Tag::Script => "script",
            Tag::Div => "div",
            Tag::Section => "section",
            Tag::Article => "article",
            Tag::Header => "header",
            Tag::Footer => "footer",
            Tag::Nav => "nav",
            Tag::Main => "main",
            Tag::Aside => "aside",
            Tag::P => "p",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::H5 => "h5",
            Tag::H6 => "h6",
            Tag::Pre => "pre",
            Tag::Blockquote => "blockquote",
            Tag::Hr => "hr",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::Span => "span",
            Tag::A => "a",
            Tag::Strong => "strong",
            Tag::Em => "em",
            Tag::B => "b",
            Tag::I => "i",
            Tag::U => "u",
            Tag::Code => "code",
            Tag::Br => "br",
            Tag::Img => "img",
            Tag::Form => "form",
            Tag::Label => "label",
            Tag::Button => "button",
            Tag::Input => "input",
            Tag::Textarea => "textarea",
            Tag::Select => "select",
            Tag::Option => "option",
            Tag::Table => "table",
            Tag::Thead => "thead",
            Tag::Tbody => "tbody",
            Tag::Tr => "tr",
            Tag::Td => "td",
            Tag::Th => "th",
            Tag::Canvas => "canvas",
            Tag::Video => "video",
        }
    }

    /// Elements the user-agent layer displays as blocks
    pub fn is_block_level(self) -> bool {
        matches!(
            self,
            Tag::Root
                | Tag::Html
                | Tag::Body
                | Tag::Div
                | Tag::Section
                | Tag::Article
                | Tag::Header
                | Tag::Footer
                | Tag::Nav
                | Tag::Main
                | Tag::Aside
                | Tag::P
                | Tag::H1
                | Tag::H2
                | Tag::H3
                | Tag::H4
                | Tag::H5
                | Tag::H6
                | Tag::Pre
                | Tag::Blockquote
                | Tag::Hr
                | Tag::Ul
                | Tag::Ol
                | Tag::Li
                | Tag::Form
                | Tag::Table
        )
    }

    /// Elements the user-agent layer never displays
    pub fn is_hidden(self) -> bool {
        matches!(
            self,
            Tag::Head | Tag::Title | Tag::Meta | Tag::Link | Tag::Style | Tag::Script
        )
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Tag::as_u8`]
    pub fn from_u8(value: u8) -> Option<Tag> {
        Self::ALL.get(value as usize).copied()
    }
}
