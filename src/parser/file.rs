//! Whole-file parsing: imports, declarations and warnings for one shader.

use std::sync::OnceLock;

use regex::Regex;

use super::bindings::BindingExtractor;
use super::consts::ConstExtractor;
use super::context::{Extractor, SourceContext};
use super::functions::FunctionExtractor;
use super::imports::{extract_all_imports, ImportError};
use super::structs::StructExtractor;
use super::{ParseWarning, WarningKind};
use crate::types::ParsedFile;

fn import_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*#define_import_path\s+([^\s;]+)")
            .expect("import path regex must compile")
    })
}

/// Result of parsing one file.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// The model, with empty `meta` and no resolved links.
    pub file: ParsedFile,
    pub warnings: Vec<ParseWarning>,
}

/// Parse WGSL source into the documentation model.
///
/// Only a malformed `#import` statement fails; everything else degrades to
/// fewer records or a warning.
pub fn parse_source(source: &str) -> Result<ParseOutput, ImportError> {
    let normalized;
    let source = if source.contains('\r') {
        normalized = source.replace("\r\n", "\n");
        normalized.as_str()
    } else {
        source
    };

    let imports = extract_all_imports(source)?;
    let (ctx, mut warnings) = SourceContext::new(source);

    if imports.unclosed_groups > 0 {
        warnings.push(ParseWarning::new(
            WarningKind::Import,
            0,
            format!(
                "{} import group(s) left open at the end of an `#import` statement",
                imports.unclosed_groups
            ),
        ));
    }

    let import_path = import_path_regex()
        .captures(&ctx.code)
        .map(|caps| caps[1].to_string());

    let file = ParsedFile {
        import_path,
        declared_imports: imports.imports,
        consts: ConstExtractor.extract(&ctx),
        structures: StructExtractor.extract(&ctx),
        functions: FunctionExtractor.extract(&ctx),
        bindings: BindingExtractor.extract(&ctx),
        meta: Default::default(),
    };

    Ok(ParseOutput { file, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MESH: &str = "\
#define_import_path bevy_pbr::mesh_functions

#import bevy_pbr::{
    mesh_view_bindings::view,
    mesh_types::MESH_FLAGS_SIGN_DETERMINANT_MODEL_3X3_BIT,
}

const EPSILON: f32 = 0.0001;

@group(1) @binding(0) var<storage> meshes: array<Mesh>;

struct Mesh {
    model: mat4x4<f32>,
};

/// World-from-local transform.
fn get_model_matrix(instance_index: u32) -> mat4x4<f32> {
    return meshes[instance_index].model;
}
";

    #[test]
    fn test_parse_whole_file() {
        let output = parse_source(MESH).unwrap();
        let file = &output.file;

        assert!(output.warnings.is_empty());
        assert_eq!(file.import_path.as_deref(), Some("bevy_pbr::mesh_functions"));
        assert_eq!(
            file.declared_imports.first_path("view"),
            Some("bevy_pbr::mesh_view_bindings::view")
        );
        assert_eq!(file.consts[0].name, "EPSILON");
        assert_eq!(file.bindings[0].name, "meshes");
        assert_eq!(file.structures[0].name, "Mesh");
        assert_eq!(file.functions[0].name, "get_model_matrix");
        assert_eq!(file.functions[0].comment, "World-from-local transform.");
        assert_eq!(file.declaration_count(), 4);
    }

    #[test]
    fn test_parsed_model_snapshot() {
        let output = parse_source("const FOO: u32 = 1u;\n").unwrap();

        insta::assert_json_snapshot!(output.file.consts, @r###"
        [
          {
            "lineNumber": 1,
            "name": "FOO",
            "comment": "",
            "typeInfo": {
              "annotations": [],
              "type": "u32",
              "fullTypePath": "u32",
              "typeLink": "",
              "typeLinkTargetsNewContext": false
            },
            "value": "1u",
            "hasShaderDefs": false,
            "shaderDefs": [],
            "annotations": []
          }
        ]
        "###);
    }

    #[test]
    fn test_crlf_line_endings() {
        let output = parse_source("// doc\r\nconst A: f32 = 1.0;\r\n").unwrap();

        assert_eq!(output.file.consts[0].comment, "doc");
        assert_eq!(output.file.consts[0].line_number, 2);
    }

    #[test]
    fn test_import_error_propagates() {
        let err = parse_source("#import foo::bar}\n").unwrap_err();

        assert_eq!(err.offset, 16);
    }

    #[test]
    fn test_warnings_are_collected() {
        let output = parse_source("#ifdef X\nconst A = 1;\n#import a::{b\n").unwrap();

        assert_eq!(output.warnings.len(), 2);
    }

    #[test]
    fn test_commented_out_import_does_not_fail() {
        let output = parse_source("/*\n#import broken::{{\n*/\nconst A = 1;\n").unwrap();

        assert!(output.file.declared_imports.is_empty());
        assert_eq!(output.file.consts[0].name, "A");
    }

    #[test]
    fn test_consts_after_alternative_function_headers() {
        let source = "\
#ifdef A
fn f() -> f32 {
#else
fn f() -> f16 {
#endif
    return 1.0;
}
const AFTER: u32 = 1u;
";
        let output = parse_source(source).unwrap();

        let names: Vec<&str> = output.file.consts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["AFTER"]);
        assert_eq!(output.file.functions.len(), 2);
    }
}
