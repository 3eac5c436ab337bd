//! A `.pbxproj` document held for a read/modify/write session.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use crate::encode::encode_document;
use crate::error::{ParseContext, Result};
use crate::options::ParseOptions;
use crate::parser::Parser;
use crate::value::{Mapping, Value};

/// A parsed project file. Owns the root value until it is written back.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    root: Value,
}

impl Project {
    /// Wrap an existing root value.
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Read and parse a project file from disk with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let ctx = ParseContext::new(Some(&path.to_string_lossy()));
        Self::read_with(BufReader::new(file), ParseOptions::default(), ctx)
    }

    /// Parse a project from any reader with default options.
    pub fn read(reader: impl Read) -> Result<Self> {
        Self::read_with(
            BufReader::new(reader),
            ParseOptions::default(),
            ParseContext::default(),
        )
    }

    /// Parse a project with explicit options and error context.
    pub fn read_with(
        reader: impl io::BufRead,
        options: ParseOptions,
        ctx: ParseContext,
    ) -> Result<Self> {
        let root = Parser::with_options(reader, options, ctx).parse()?;
        Ok(Self { root })
    }

    /// Write the project as a complete `.pbxproj` file.
    pub fn write(&self, mut writer: impl Write) -> io::Result<()> {
        writer.write_all(encode_document(&self.root).as_bytes())
    }

    /// Write the project to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, encode_document(&self.root))
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    pub fn into_root(self) -> Value {
        self.root
    }

    /// The `objects` table, keyed by object identifier.
    pub fn objects(&self) -> Option<&Mapping> {
        self.root.get("objects").and_then(Value::as_mapping)
    }

    pub fn objects_mut(&mut self) -> Option<&mut Mapping> {
        self.root
            .as_mapping_mut()
            .and_then(|root| root.get_mut("objects"))
            .and_then(Value::as_mapping_mut)
    }

    /// Look up one entry of the `objects` table.
    pub fn object(&self, id: &str) -> Option<&Value> {
        self.objects().and_then(|objects| objects.get(id))
    }

    /// The object named by the top-level `rootObject` key.
    pub fn root_object(&self) -> Option<&Value> {
        let id = self.root.get("rootObject").and_then(Value::as_str)?;
        self.object(id)
    }
}

impl std::fmt::Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&encode_document(&self.root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "// !$*UTF8*$!\n\
        {\n\
        \tarchiveVersion = 1;\n\
        \tobjects = {\n\
        \t\tAAAA /* Project object */ = {\n\
        \t\t\tisa = PBXProject;\n\
        \t\t\tmainGroup = BBBB;\n\
        \t\t};\n\
        \t\tBBBB = {\n\
        \t\t\tisa = PBXGroup;\n\
        \t\t\tchildren = (\n\
        \t\t\t);\n\
        \t\t};\n\
        \t};\n\
        \trootObject = AAAA /* Project object */;\n\
        }\n";

    #[test]
    fn test_read_and_lookup() {
        let project = Project::read(MINIMAL.as_bytes()).unwrap();
        assert_eq!(project.objects().map(Mapping::len), Some(2));
        let root_object = project.root_object().unwrap();
        assert_eq!(root_object.get("isa"), Some(&Value::from("PBXProject")));
        let main_group = root_object.get("mainGroup").and_then(Value::as_str).unwrap();
        assert_eq!(
            project.object(main_group).and_then(|g| g.get("isa")),
            Some(&Value::from("PBXGroup"))
        );
        assert!(project.object("CCCC").is_none());
    }

    #[test]
    fn test_modify_and_write() {
        let mut project = Project::read(MINIMAL.as_bytes()).unwrap();
        project
            .objects_mut()
            .and_then(|objects| objects.get_mut("BBBB"))
            .and_then(|group| group.as_mapping_mut())
            .and_then(|group| group.get_mut("children"))
            .and_then(Value::as_array_mut)
            .unwrap()
            .push("CCCC".into());

        let mut out = Vec::new();
        project.write(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("// !$*UTF8*$!\n{\n\tarchiveVersion = 1;\n"));
        assert!(text.contains("\t\t\tchildren = (\n\t\t\t\tCCCC,\n\t\t\t);\n"));
        assert!(text.ends_with("\trootObject = AAAA;\n}\n"));

        let reread = Project::read(text.as_bytes()).unwrap();
        assert_eq!(reread, project);
        assert_eq!(reread.to_string(), text);
    }

    #[test]
    fn test_save_and_open() {
        let mut project = Project::read(MINIMAL.as_bytes()).unwrap();
        project
            .root_mut()
            .as_mapping_mut()
            .unwrap()
            .insert("archiveVersion", "2".into());

        let path = std::env::temp_dir().join(format!(
            "libpbxproj-save-{}.pbxproj",
            std::process::id()
        ));
        project.save(&path).unwrap();
        let reopened = Project::open(&path);
        fs::remove_file(&path).unwrap();

        let root = reopened.unwrap().into_root();
        assert_eq!(root.get("archiveVersion"), Some(&Value::from("2")));
        assert_eq!(root, project.into_root());
    }

    #[test]
    fn test_open_missing_file() {
        let err = Project::open("/nonexistent/dir/project.pbxproj").unwrap_err();
        assert!(matches!(err, crate::ParseError::Io(_)));
    }
}
