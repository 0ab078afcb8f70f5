//! Integration tests for loading the student table from CSV.

use std::io::Write;

use cademy_ingest::{IngestError, read_student_table, validate_required_columns};
use tempfile::NamedTempFile;

const STUDENTS_CSV: &str = "\
uuid,name,dob,sex,contact_info,job_id,num_course_taken,current_career_path_id,time_spent_hrs,mailing_address
1,Annabelle Avery,1943-07-03,F,\"{'email': 'annabelle_avery9376@woohoo.com'}\",7.0,6.0,1.0,4.99,\"303 N Timber Key, Irondale, Wyoming, 84736\"
2,Micah Rubio,1991-02-07,M,\"{'email': 'rubio6772@hmail.com'}\",7.0,5.0,8.0,4.4,\"767 Crescent Fair, Shoals, Indiana, 37439\"
3,Hosea Dale,1989-12-07,M,\"{'email': 'hosea_dale8084@coldmail.com'}\",7.0,,,,\"P.O. Box 41269, St. Bonaventure, Virginia, 83637\"
";

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

#[test]
fn reads_student_table() {
    let file = write_csv(STUDENTS_CSV);
    let df = read_student_table(file.path()).unwrap();

    assert_eq!(df.height(), 3);
    assert_eq!(df.width(), 10);
    validate_required_columns(&df).unwrap();

    let contact = df.column("contact_info").unwrap().str().unwrap();
    assert_eq!(
        contact.get(1),
        Some("{'email': 'rubio6772@hmail.com'}")
    );
    let courses = df.column("num_course_taken").unwrap();
    assert_eq!(courses.null_count(), 1);
}

#[test]
fn missing_column_is_reported() {
    let file = write_csv("dob,contact_info\n2000-01-01,\"{}\"\n");
    let df = read_student_table(file.path()).unwrap();
    let err = validate_required_columns(&df).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn { column } if column == "job_id"));
}

#[test]
fn bad_numeric_cell_after_inference_window_is_kept_as_text() {
    let mut content =
        String::from("uuid,dob,contact_info,job_id,num_course_taken,current_career_path_id,time_spent_hrs\n");
    for uuid in 0..150 {
        content.push_str(&format!("{uuid},1990-01-01,\"{{}}\",5,3,1,2\n"));
    }
    content.push_str("150,1990-01-01,\"{}\",five,2.5,1,2\n");
    let file = write_csv(&content);

    let df = read_student_table(file.path()).unwrap();

    assert_eq!(df.height(), 151);
    let job = df.column("job_id").unwrap().str().unwrap();
    assert_eq!(job.get(0), Some("5"));
    assert_eq!(job.get(150), Some("five"));
    let courses = df.column("num_course_taken").unwrap().str().unwrap();
    assert_eq!(courses.get(150), Some("2.5"));
    let uuid = df.column("uuid").unwrap().i64().unwrap();
    assert_eq!(uuid.get(150), Some(150));
}
