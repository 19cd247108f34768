use csv::Reader;
use std::collections::HashMap;
use std::path::Path;

use junta_roster::MemberData;

/// Loads prospective members from a CSV file.
///
/// Columns are located by header name. Rows without a name are skipped; a
/// later row with the same document id replaces the earlier one in place.
pub fn load_members<P: AsRef<Path>>(csv_path: P) -> Result<Vec<MemberData>, Box<dyn std::error::Error>> {
    let mut reader = Reader::from_path(csv_path)?;
    let headers = reader.headers()?.clone();

    let find = |needles: &[&str], fallback: usize| {
        headers
            .iter()
            .position(|h| {
                let h = h.to_lowercase();
                needles.iter().any(|n| h.contains(n))
            })
            .unwrap_or(fallback)
    };
    let name_col = find(&["name", "nombre"], 0);
    let document_col = find(&["document", "dni"], 1);
    let phone_col = find(&["phone", "telefono", "celular"], 2);
    let email_col = find(&["email", "correo"], 3);

    let mut members: Vec<MemberData> = Vec::new();
    let mut by_document: HashMap<String, usize> = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let field = |col: usize| record.get(col).unwrap_or("").trim().to_string();

        let member = MemberData {
            name: field(name_col),
            document_id: field(document_col),
            phone: field(phone_col),
            email: field(email_col),
        };

        if member.name.is_empty() {
            continue;
        }

        if !member.document_id.is_empty() {
            if let Some(&existing) = by_document.get(&member.document_id) {
                members[existing] = member;
                continue;
            }
            by_document.insert(member.document_id.clone(), members.len());
        }
        members.push(member);
    }

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_merges_by_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Full name,DNI,Phone,Email").unwrap();
        writeln!(file, "Ana Torres,11111111,987000111,ana@mail.pe").unwrap();
        writeln!(file, ",22222222,,").unwrap();
        writeln!(file, "Beto Ruiz,33333333,987000333,").unwrap();
        writeln!(file, "Ana T. Torres,11111111,987000999,ana@mail.pe").unwrap();
        file.flush().unwrap();

        let members = load_members(file.path()).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Ana T. Torres");
        assert_eq!(members[0].phone, "987000999");
        assert_eq!(members[1].name, "Beto Ruiz");
    }

    #[test]
    fn column_order_follows_headers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "correo,nombre,celular,dni").unwrap();
        writeln!(file, "c@mail.pe,Carla,999888777,44444444").unwrap();
        file.flush().unwrap();

        let members = load_members(file.path()).unwrap();
        assert_eq!(
            members[0],
            MemberData::named("Carla")
                .with_document_id("44444444")
                .with_phone("999888777")
                .with_email("c@mail.pe")
        );
    }
}
