// Extension -> editor language id lookup used when opening gist files.

const LANGUAGES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("py", "python"),
    ("rb", "ruby"),
    ("go", "go"),
    ("rs", "rust"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("cs", "csharp"),
    ("php", "php"),
    ("sh", "shellscript"),
    ("bash", "shellscript"),
    ("zsh", "shellscript"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("xml", "xml"),
    ("html", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("less", "less"),
    ("md", "markdown"),
    ("sql", "sql"),
    ("swift", "swift"),
    ("kt", "kotlin"),
    ("vue", "vue"),
    ("jsx", "javascriptreact"),
    ("tsx", "typescriptreact"),
];

/// Language id for `file_name`, or `None` for unknown extensions.
///
/// The candidate is the text after the last `.`; a name without a dot
/// is looked up as a whole.
pub fn language_for(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit('.').next()?.to_lowercase();
    LANGUAGES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| *lang)
}
