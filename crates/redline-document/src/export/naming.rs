// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output file names for revised documents.

use redline_core::types::OriginFormat;

/// Split `file_name` at its last dot. Dotfiles and names without a dot have
/// no extension.
pub fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    }
}

/// Name of the revised export of `file_name`.
///
/// | origin | name |
/// |---|---|
/// | plain text | `{stem}{suffix}{.ext}` |
/// | PDF | `{stem}{suffix}.pdf` |
/// | word processor | `{stem}{suffix}.txt` |
/// | other | `{stem}{suffix}{.ext}.txt` |
pub fn revised_file_name(file_name: &str, format: OriginFormat, suffix: &str) -> String {
    let (stem, ext) = split_extension(file_name);
    let dotted = ext.map(|ext| format!(".{ext}")).unwrap_or_default();
    match format {
        OriginFormat::PlainText => format!("{stem}{suffix}{dotted}"),
        OriginFormat::Pdf => format!("{stem}{suffix}.pdf"),
        OriginFormat::WordProcessor(_) => format!("{stem}{suffix}.txt"),
        OriginFormat::Other => format!("{stem}{suffix}{dotted}.txt"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_core::types::WordFormat;

    const SUFFIX: &str = "-revised";

    #[test]
    fn plain_text_names() {
        assert_eq!(
            revised_file_name("terms.txt", OriginFormat::PlainText, SUFFIX),
            "terms-revised.txt"
        );
        assert_eq!(
            revised_file_name("terms", OriginFormat::PlainText, SUFFIX),
            "terms-revised"
        );
        assert_eq!(
            revised_file_name("nda.v2.txt", OriginFormat::PlainText, SUFFIX),
            "nda.v2-revised.txt"
        );
    }

    #[test]
    fn pdf_and_word_names() {
        assert_eq!(
            revised_file_name("NDA.PDF", OriginFormat::Pdf, SUFFIX),
            "NDA-revised.pdf"
        );
        assert_eq!(
            revised_file_name(
                "lease.docx",
                OriginFormat::WordProcessor(WordFormat::Docx),
                SUFFIX
            ),
            "lease-revised.txt"
        );
        assert_eq!(
            revised_file_name("old.doc", OriginFormat::WordProcessor(WordFormat::Doc), SUFFIX),
            "old-revised.txt"
        );
    }

    #[test]
    fn other_names_gain_txt() {
        assert_eq!(
            revised_file_name("notes.rtf", OriginFormat::Other, SUFFIX),
            "notes-revised.rtf.txt"
        );
        assert_eq!(
            revised_file_name("README", OriginFormat::Other, SUFFIX),
            "README-revised.txt"
        );
    }

    #[test]
    fn dotfile_has_no_extension() {
        assert_eq!(split_extension(".env"), (".env", None));
    }
}
