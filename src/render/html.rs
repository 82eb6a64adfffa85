//! HTML page generation.

use std::fmt::Write;
use std::sync::OnceLock;

use regex::Regex;

use super::{IndexEntry, PageRenderer};
use crate::error::Result;
use crate::parser::Branch;
use crate::types::{
    Annotation, Binding, Const, DefContext, Function, NamedType, ParsedFile, Structure, TypeInfo,
};

/// Renders documentation pages as standalone HTML.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    version: String,
}

impl HtmlRenderer {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn write_head(&self, out: &mut String, title: &str) -> Result<()> {
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "  <meta charset=\"UTF-8\">")?;
        writeln!(
            out,
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(out, "  <title>{} - WGSL docs {}</title>", escape_html(title), escape_html(&self.version))?;
        writeln!(out, "  <link rel=\"stylesheet\" href=\"/public/styles.css\">")?;
        writeln!(
            out,
            "  <script defer src=\"/public/search.js\" data-version=\"{}\"></script>",
            escape_html(&self.version)
        )?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<nav class=\"topbar\">")?;
        writeln!(
            out,
            "  <a class=\"home\" href=\"/{}/index.html\">WGSL docs <span class=\"version\">{}</span></a>",
            escape_html(&self.version),
            escape_html(&self.version)
        )?;
        writeln!(
            out,
            "  <input id=\"search\" type=\"search\" placeholder=\"Search functions, structs, consts...\" autocomplete=\"off\">"
        )?;
        writeln!(out, "  <ul id=\"search-results\"></ul>")?;
        writeln!(out, "</nav>")?;
        Ok(())
    }

    fn write_foot(&self, out: &mut String) -> Result<()> {
        writeln!(out, "<footer>Generated by wgsldoc</footer>")?;
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
        Ok(())
    }

    fn write_imports(&self, out: &mut String, file: &ParsedFile) -> Result<()> {
        if file.declared_imports.is_empty() {
            return Ok(());
        }

        writeln!(out, "<section id=\"imports\">")?;
        writeln!(out, "  <h2>Imports</h2>")?;
        writeln!(out, "  <ul class=\"imports\">")?;
        for (name, paths) in file.declared_imports.iter() {
            for path in paths {
                writeln!(
                    out,
                    "    <li><code>{}</code> <span class=\"dim\">from</span> <code>{}</code></li>",
                    escape_html(name),
                    escape_html(path)
                )?;
            }
        }
        writeln!(out, "  </ul>")?;
        writeln!(out, "</section>")?;
        Ok(())
    }

    fn write_bindings(&self, out: &mut String, file: &ParsedFile) -> Result<()> {
        if file.bindings.is_empty() {
            return Ok(());
        }

        writeln!(out, "<section id=\"bindings\">")?;
        writeln!(out, "  <h2>Bindings</h2>")?;
        if file.bindings_have_shader_defs() {
            writeln!(out, "  <p class=\"note\">Some bindings are conditionally compiled.</p>")?;
        }
        for binding in &file.bindings {
            self.write_binding(out, file, binding)?;
        }
        writeln!(out, "</section>")?;
        Ok(())
    }

    fn write_binding(&self, out: &mut String, file: &ParsedFile, binding: &Binding) -> Result<()> {
        write_item_open(out, &binding.name, "binding")?;
        let qualifier = binding
            .binding_type
            .as_deref()
            .map(|t| format!("&lt;{}&gt;", escape_html(t)))
            .unwrap_or_default();
        writeln!(
            out,
            "    <pre class=\"signature\">{}var{} <span class=\"name\">{}</span>: {};</pre>",
            annotations_html(&binding.annotations),
            qualifier,
            escape_html(&binding.name),
            type_html(&binding.type_info)
        )?;
        self.write_details(out, file, binding.line_number, &binding.comment, &binding.context)?;
        writeln!(out, "  </article>")?;
        Ok(())
    }

    fn write_consts(&self, out: &mut String, file: &ParsedFile) -> Result<()> {
        if file.consts.is_empty() {
            return Ok(());
        }

        writeln!(out, "<section id=\"consts\">")?;
        writeln!(out, "  <h2>Constants</h2>")?;
        if file.consts_have_shader_defs() {
            writeln!(out, "  <p class=\"note\">Some constants are conditionally compiled.</p>")?;
        }
        for constant in &file.consts {
            self.write_const(out, file, constant)?;
        }
        writeln!(out, "</section>")?;
        Ok(())
    }

    fn write_const(&self, out: &mut String, file: &ParsedFile, constant: &Const) -> Result<()> {
        write_item_open(out, &constant.name, "const")?;
        let ty = if constant.type_info.ty.is_empty() {
            String::new()
        } else {
            format!(": {}", type_html(&constant.type_info))
        };
        writeln!(
            out,
            "    <pre class=\"signature\">const <span class=\"name\">{}</span>{} = {};</pre>",
            escape_html(&constant.name),
            ty,
            escape_html(&constant.value)
        )?;
        self.write_details(out, file, constant.line_number, &constant.comment, &constant.context)?;
        writeln!(out, "  </article>")?;
        Ok(())
    }

    fn write_structures(&self, out: &mut String, file: &ParsedFile) -> Result<()> {
        if file.structures.is_empty() {
            return Ok(());
        }

        writeln!(out, "<section id=\"structs\">")?;
        writeln!(out, "  <h2>Structures</h2>")?;
        if file.structures_have_shader_defs() {
            writeln!(out, "  <p class=\"note\">Some structures are conditionally compiled.</p>")?;
        }
        for structure in &file.structures {
            self.write_structure(out, file, structure)?;
        }
        writeln!(out, "</section>")?;
        Ok(())
    }

    fn write_structure(&self, out: &mut String, file: &ParsedFile, structure: &Structure) -> Result<()> {
        write_item_open(out, &structure.name, "struct")?;
        writeln!(
            out,
            "    <pre class=\"signature\">struct <span class=\"name\">{}</span></pre>",
            escape_html(&structure.name)
        )?;
        self.write_details(out, file, structure.line_number, &structure.comment, &structure.context)?;
        if structure.has_fields() {
            write_named_types(out, "Fields", &structure.fields, structure.fields_have_shader_defs())?;
        }
        writeln!(out, "  </article>")?;
        Ok(())
    }

    fn write_functions(&self, out: &mut String, file: &ParsedFile) -> Result<()> {
        if file.functions.is_empty() {
            return Ok(());
        }

        writeln!(out, "<section id=\"functions\">")?;
        writeln!(out, "  <h2>Functions</h2>")?;
        for function in &file.functions {
            self.write_function(out, file, function)?;
        }
        writeln!(out, "</section>")?;
        Ok(())
    }

    fn write_function(&self, out: &mut String, file: &ParsedFile, function: &Function) -> Result<()> {
        write_item_open(out, &function.name, "function")?;

        let params = function
            .params
            .iter()
            .map(|p| format!("{}: {}", escape_html(&p.name), type_html(&p.type_info)))
            .collect::<Vec<_>>()
            .join(", ");
        let ret = match &function.return_type {
            Some(info) => format!(" -&gt; {}{}", annotations_html(&info.annotations), type_html(info)),
            None => String::new(),
        };
        writeln!(
            out,
            "    <pre class=\"signature\">{}fn <span class=\"name\">{}</span>({}){}</pre>",
            annotations_html(&function.annotations),
            escape_html(&function.name),
            params,
            ret
        )?;

        if let Some(stage) = function.stage_attribute {
            write!(out, "    <p class=\"stage\">{} entry point", stage.as_str())?;
            if function.has_workgroup_size() {
                write!(
                    out,
                    ", workgroup size <code>({})</code>",
                    escape_html(&function.workgroup_size.join(", "))
                )?;
            }
            writeln!(out, "</p>")?;
        }

        self.write_details(out, file, function.line_number, &function.comment, &function.context)?;
        if function.has_params() {
            let conditional = function.params.iter().any(|p| p.context.has_shader_defs);
            write_named_types(out, "Parameters", &function.params, conditional)?;
        }
        writeln!(out, "  </article>")?;
        Ok(())
    }

    /// Comment, source line link and shader-def context of one item.
    fn write_details(
        &self,
        out: &mut String,
        file: &ParsedFile,
        line: usize,
        comment: &str,
        context: &DefContext,
    ) -> Result<()> {
        if !comment.is_empty() {
            writeln!(out, "    <div class=\"comment\">{}</div>", render_comment(comment))?;
        }
        if !file.meta.source_link.is_empty() {
            writeln!(
                out,
                "    <a class=\"source\" href=\"{}#L{}\" target=\"_blank\">line {}</a>",
                escape_html(&file.meta.source_link),
                line,
                line
            )?;
        } else {
            writeln!(out, "    <span class=\"source\">line {}</span>", line)?;
        }
        write_shader_defs(out, context)?;
        Ok(())
    }
}

impl PageRenderer for HtmlRenderer {
    fn render_file(&self, file: &ParsedFile) -> Result<String> {
        let mut out = String::new();
        self.write_head(&mut out, &file.meta.filename)?;

        writeln!(out, "<main class=\"content\">")?;
        writeln!(out, "<header>")?;
        writeln!(out, "  <h1>{}</h1>", escape_html(&file.meta.filename))?;
        if let Some(import_path) = &file.import_path {
            writeln!(
                out,
                "  <p class=\"import-path\"><code>#import {}</code></p>",
                escape_html(import_path)
            )?;
        }
        if !file.meta.source_link.is_empty() {
            writeln!(
                out,
                "  <a class=\"source\" href=\"{}\" target=\"_blank\">View source</a>",
                escape_html(&file.meta.source_link)
            )?;
        }
        writeln!(out, "</header>")?;

        self.write_imports(&mut out, file)?;
        self.write_bindings(&mut out, file)?;
        self.write_consts(&mut out, file)?;
        self.write_structures(&mut out, file)?;
        self.write_functions(&mut out, file)?;

        writeln!(out, "</main>")?;
        self.write_foot(&mut out)?;
        Ok(out)
    }

    fn render_index(&self, entries: &[IndexEntry]) -> Result<String> {
        let mut out = String::new();
        self.write_head(&mut out, "Index")?;

        writeln!(out, "<main class=\"content\">")?;
        writeln!(out, "<header>")?;
        writeln!(out, "  <h1>WGSL documentation {}</h1>", escape_html(&self.version))?;
        writeln!(out, "</header>")?;
        writeln!(out, "<ul class=\"file-list\">")?;
        for entry in entries {
            write!(
                out,
                "  <li><a href=\"{}\">{}</a>",
                escape_html(&entry.doc_path),
                escape_html(&entry.doc_path)
            )?;
            if let Some(import_path) = &entry.import_path {
                write!(out, " <code class=\"dim\">{}</code>", escape_html(import_path))?;
            }
            writeln!(out, "</li>")?;
        }
        writeln!(out, "</ul>")?;
        writeln!(out, "</main>")?;

        self.write_foot(&mut out)?;
        Ok(out)
    }

    fn render_not_found(&self) -> Result<String> {
        let mut out = String::new();
        self.write_head(&mut out, "Not found")?;

        writeln!(out, "<main class=\"content not-found\">")?;
        writeln!(out, "  <h1>404</h1>")?;
        writeln!(out, "  <p>This page does not exist in the documentation.</p>")?;
        writeln!(
            out,
            "  <p><a href=\"/{}/index.html\">Back to the index</a></p>",
            escape_html(&self.version)
        )?;
        writeln!(out, "</main>")?;

        self.write_foot(&mut out)?;
        Ok(out)
    }
}

fn write_item_open(out: &mut String, name: &str, kind: &str) -> Result<()> {
    writeln!(
        out,
        "  <article class=\"item {}\" id=\"{}\">",
        kind,
        escape_html(name)
    )?;
    Ok(())
}

fn write_named_types(
    out: &mut String,
    title: &str,
    items: &[NamedType],
    conditional: bool,
) -> Result<()> {
    writeln!(out, "    <h4>{}</h4>", title)?;
    writeln!(out, "    <table class=\"named-types\">")?;
    for item in items {
        write!(
            out,
            "      <tr><td>{}<code>{}</code></td><td>{}</td>",
            annotations_html(&item.annotations),
            escape_html(&item.name),
            type_html(&item.type_info)
        )?;
        if conditional {
            write!(out, "<td>")?;
            write_shader_defs(out, &item.context)?;
            write!(out, "</td>")?;
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "    </table>")?;
    Ok(())
}

fn write_shader_defs(out: &mut String, context: &DefContext) -> Result<()> {
    if !context.has_shader_defs {
        return Ok(());
    }

    write!(out, "<ul class=\"shader-defs\">")?;
    for def in &context.shader_defs {
        let (class, label) = match def.branch {
            Branch::If => ("if", "#ifdef"),
            Branch::Else => ("else", "#else of"),
        };
        write!(
            out,
            "<li class=\"branch-{}\" title=\"line {}\">{} <code>{}</code></li>",
            class,
            def.line_number,
            label,
            escape_html(&def.def_name)
        )?;
    }
    writeln!(out, "</ul>")?;
    Ok(())
}

fn annotations_html(annotations: &[Annotation]) -> String {
    annotations
        .iter()
        .map(|a| {
            if a.value.is_empty() {
                format!("<span class=\"annotation\">@{}</span> ", escape_html(&a.name))
            } else {
                format!(
                    "<span class=\"annotation\">@{}({})</span> ",
                    escape_html(&a.name),
                    escape_html(&a.value)
                )
            }
        })
        .collect()
}

/// A type reference, linked when resolved.
fn type_html(info: &TypeInfo) -> String {
    let text = escape_html(&info.ty);
    if info.type_link.is_empty() {
        return format!("<code class=\"type\">{}</code>", text);
    }

    let external = info.type_link.starts_with("http://") || info.type_link.starts_with("https://");
    let target = if info.type_link_targets_new_context || external {
        " target=\"_blank\""
    } else {
        ""
    };
    format!(
        "<a class=\"type\" href=\"{}\"{}><code>{}</code></a>",
        escape_html(&info.type_link),
        target,
        text
    )
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^\s<>"`]+"#).expect("url regex must compile"))
}

fn code_span_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`\n]+)`").expect("code span regex must compile"))
}

/// Escape a doc comment, link bare URLs and turn backtick spans into
/// `<code>`. Paragraph breaks become `<br>`.
///
/// URLs are found in the raw text so escaped entities never end up in an
/// `href`.
pub fn render_comment(comment: &str) -> String {
    let mut linked = String::with_capacity(comment.len());
    let mut last = 0;
    for url in url_regex().find_iter(comment) {
        linked.push_str(&escape_html(&comment[last..url.start()]));
        let href = escape_html(url.as_str());
        linked.push_str(&format!("<a href=\"{}\" target=\"_blank\">{}</a>", href, href));
        last = url.end();
    }
    linked.push_str(&escape_html(&comment[last..]));

    let coded = code_span_regex().replace_all(&linked, "<code>$1</code>");
    coded.replace('\n', "<br>\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use crate::resolve::{ImportIndex, Resolver, TypeLinks};

    fn page(source: &str) -> String {
        let mut file = parse_source(source).unwrap().file;
        file.meta.filename = "test.wgsl".to_string();
        file.meta.source_link = "https://example.com/test.wgsl".to_string();
        let index = ImportIndex::new();
        let links = TypeLinks::builtin();
        Resolver::new(&index, &links).resolve_file(&mut file);
        HtmlRenderer::new("0.15.0").render_file(&file).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > \"d\""), "a &lt; b &amp;&amp; c &gt; &quot;d&quot;");
    }

    #[test]
    fn test_render_comment_quoted_url() {
        let html = render_comment("see \"https://x.com/a\" now");

        assert_eq!(
            html,
            "see &quot;<a href=\"https://x.com/a\" target=\"_blank\">https://x.com/a</a>&quot; now"
        );
    }

    #[test]
    fn test_render_comment_links_and_code() {
        let html = render_comment("See https://gpuweb.github.io/ for `vec4<f32>`.");

        assert!(html.contains("<a href=\"https://gpuweb.github.io/\" target=\"_blank\">"));
        assert!(html.contains("<code>vec4&lt;f32&gt;</code>"));
    }

    #[test]
    fn test_page_has_anchors_and_links() {
        let html = page("struct Light { color: vec4<f32> }\n// Shades.\nfn shade(l: Light) -> f32 { return 1.0; }\n");

        assert!(html.contains("id=\"Light\""));
        assert!(html.contains("id=\"shade\""));
        assert!(html.contains("href=\"#Light\""));
        assert!(html.contains("href=\"https://www.w3.org/TR/WGSL/#vector-types\" target=\"_blank\""));
        assert!(html.contains("https://example.com/test.wgsl#L3"));
        assert!(html.contains("<div class=\"comment\">Shades.</div>"));
    }

    #[test]
    fn test_page_shows_shader_defs_and_stage() {
        let html = page("#ifdef DEPTH\n@compute @workgroup_size(64)\nfn cull() {}\n#endif\n");

        assert!(html.contains("class=\"branch-if\""));
        assert!(html.contains("<code>DEPTH</code>"));
        assert!(html.contains("compute entry point"));
        assert!(html.contains("<code>(64)</code>"));
    }

    #[test]
    fn test_source_text_is_escaped() {
        let html = page("const MASK = 1u << 3u;\n");

        assert!(html.contains("1u &lt;&lt; 3u"));
    }

    #[test]
    fn test_index_and_not_found() {
        let renderer = HtmlRenderer::new("0.15.0");
        let index = renderer
            .render_index(&[IndexEntry {
                doc_path: "bevy_pbr/mesh.html".to_string(),
                filename: "mesh.wgsl".to_string(),
                import_path: Some("bevy_pbr::mesh".to_string()),
            }])
            .unwrap();

        assert!(index.contains("<a href=\"bevy_pbr/mesh.html\">"));
        assert!(index.contains("bevy_pbr::mesh"));

        let not_found = renderer.render_not_found().unwrap();
        assert!(not_found.contains("/0.15.0/index.html"));
    }
}
