mod common;

use std::fs;

use common::TestContext;
use predicates::prelude::*;

const TEMPLATE: &str = "\
%range 1 3%
%jar pixi.jar%
%jobmanager SLURM%

%yaml begin%
val=%i% f=%f 0.0 1.0%
%yaml end%

%job begin%
#JOB %job_name%
run %jar_path% %input_path% %i0% %i1%
%job end%
";

#[test]
fn create_emits_one_config_file_per_index() {
    let ctx = TestContext::new();
    let template = ctx.write_template("sweep", TEMPLATE);
    let out = ctx.output_dir();

    ctx.cli()
        .args(["create", "-i"])
        .arg(&template)
        .args(["-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 3 config file(s)"));

    let expected = [
        ("tmp1.yaml", "val=1 f=0.0\n"),
        ("tmp2.yaml", "val=2 f=0.5\n"),
        ("tmp3.yaml", "val=3 f=1.0\n"),
    ];
    for (name, body) in expected {
        assert_eq!(fs::read_to_string(out.join(name)).unwrap(), body);
    }
}

#[test]
fn create_writes_one_array_job_file_per_run() {
    let ctx = TestContext::new();
    let template = ctx.write_template("sweep", TEMPLATE);
    let out = ctx.output_dir();

    ctx.cli().args(["create", "-i"]).arg(&template).arg("-o").arg(&out).assert().success();

    let body = fs::read_to_string(out.join("sweep.slrm")).unwrap();
    assert!(body.contains("#JOB sweep"));
    assert!(body.contains("run pixi.jar"));
    assert!(body.contains("tmp$SLURM_ARRAY_TASK_ID.yaml"));
    assert!(body.contains(" 1 3"));

    let job_files: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "slrm"))
        .collect();
    assert_eq!(job_files.len(), 1);
}

#[test]
fn missing_range_directive_writes_nothing() {
    let ctx = TestContext::new();
    let text = TEMPLATE.replacen("%range 1 3%\n", "", 1);
    let template = ctx.write_template("sweep", &text);
    let out = ctx.output_dir();

    ctx.cli()
        .args(["create", "-i"])
        .arg(&template)
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing directive '%range%'"));

    assert!(!out.exists());
}

#[test]
fn unknown_scheduler_writes_nothing() {
    let ctx = TestContext::new();
    let text = TEMPLATE.replacen("SLURM", "UNKNOWN", 1);
    let template = ctx.write_template("sweep", &text);
    let out = ctx.output_dir();

    ctx.cli()
        .args(["create", "-i"])
        .arg(&template)
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown scheduler 'UNKNOWN'"));

    assert!(!out.exists());
}

#[test]
fn eval_marker_is_replaced_by_its_result() {
    let ctx = TestContext::new();
    let text = TEMPLATE
        .replacen("%range 1 3%", "%range 4 4%", 1)
        .replacen("val=%i% f=%f 0.0 1.0%", "doubled=%eval i*2%", 1);
    let template = ctx.write_template("sweep", &text);
    let out = ctx.output_dir();

    ctx.cli().args(["create", "-i"]).arg(&template).arg("-o").arg(&out).assert().success();

    assert_eq!(fs::read_to_string(out.join("tmp4.yaml")).unwrap(), "doubled=8\n");
}

#[test]
fn exec_preamble_feeds_eval_markers() {
    let ctx = TestContext::new();
    let text = format!(
        "{}\n%exec begin%\nw = i * 10\n%exec end%\n",
        TEMPLATE.replacen("val=%i% f=%f 0.0 1.0%", "w=%eval w + i%", 1)
    );
    let template = ctx.write_template("sweep", &text);
    let out = ctx.output_dir();

    ctx.cli().args(["create", "-i"]).arg(&template).arg("-o").arg(&out).assert().success();

    assert_eq!(fs::read_to_string(out.join("tmp2.yaml")).unwrap(), "w=22\n");
}

#[test]
fn failing_expression_reports_index_and_text() {
    let ctx = TestContext::new();
    let text = TEMPLATE.replacen("val=%i% f=%f 0.0 1.0%", "bad=%eval nope + 1%", 1);
    let template = ctx.write_template("sweep", &text);

    ctx.cli()
        .args(["create", "-i"])
        .arg(&template)
        .arg("-o")
        .arg(ctx.output_dir())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to evaluate 'nope + 1' at index 1"));
}

#[test]
fn rerun_removes_stale_files_from_previous_runs() {
    let ctx = TestContext::new();
    let out = ctx.output_dir();

    let wide = ctx.write_template("sweep", TEMPLATE);
    ctx.cli().args(["create", "-i"]).arg(&wide).arg("-o").arg(&out).assert().success();
    assert!(out.join("tmp3.yaml").exists());

    let narrow =
        ctx.write_template("sweep", &TEMPLATE.replacen("%range 1 3%", "%range 1 1%", 1));
    ctx.cli().args(["create", "-i"]).arg(&narrow).arg("-o").arg(&out).assert().success();

    assert!(out.join("tmp1.yaml").exists());
    assert!(!out.join("tmp2.yaml").exists());
    assert!(!out.join("tmp3.yaml").exists());
}

#[test]
fn output_block_is_used_when_no_override_is_given() {
    let ctx = TestContext::new();
    let text = format!("{TEMPLATE}\n%output begin%%job_name%_files%output end%\n");
    let template = ctx.write_template("sweep", &text);

    ctx.cli().args(["create", "-i"]).arg(&template).assert().success();

    let out = ctx.work_dir().join("sweep_files");
    assert!(out.join("tmp1.yaml").exists());
    assert!(out.join("sweep.slrm").exists());
}

#[test]
fn missing_output_path_is_fatal() {
    let ctx = TestContext::new();
    let template = ctx.write_template("sweep", TEMPLATE);

    ctx.cli()
        .args(["create", "-i"])
        .arg(&template)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output path not defined"));
}

#[test]
fn jobmanager_override_changes_the_job_file_variant() {
    let ctx = TestContext::new();
    let template = ctx.write_template("sweep", TEMPLATE);
    let out = ctx.output_dir();

    ctx.cli()
        .args(["create", "-i"])
        .arg(&template)
        .arg("-o")
        .arg(&out)
        .args(["-j", "SGE"])
        .assert()
        .success();

    let body = fs::read_to_string(out.join("sweep.qjob")).unwrap();
    assert!(body.contains("tmp$SGE_TASK_ID.yaml"));
    assert!(!out.join("sweep.slrm").exists());
}

#[test]
fn missing_job_template_for_scheduler_is_fatal() {
    let ctx = TestContext::new();
    // Only an SGE-specific job block while the template resolves to SLURM.
    let text = TEMPLATE
        .replace("%job begin%", "%SGE job begin%")
        .replace("%job end%", "%SGE job end%");
    let template = ctx.write_template("sweep", &text);

    ctx.cli()
        .args(["create", "-i"])
        .arg(&template)
        .arg("-o")
        .arg(ctx.output_dir())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No job template for scheduler 'SLURM'"));
}

#[test]
fn exclusive_float_spacing_stops_short_of_the_end() {
    let ctx = TestContext::new();
    let text = TEMPLATE.replacen("%range 1 3%", "%range 1 2%", 1);
    let template = ctx.write_template("sweep", &text);
    let out = ctx.output_dir();

    ctx.cli()
        .args(["create", "-i"])
        .arg(&template)
        .arg("-o")
        .arg(&out)
        .args(["--float-spacing", "exclusive"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(out.join("tmp1.yaml")).unwrap(), "val=1 f=0.0\n");
    assert_eq!(fs::read_to_string(out.join("tmp2.yaml")).unwrap(), "val=2 f=0.5\n");
}
