use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create terms table
        manager
            .create_table(
                Table::create()
                    .table(Terms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Terms::TermId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Terms::Year).integer().not_null())
                    .col(ColumnDef::new(Terms::Semester).string().not_null())
                    .col(ColumnDef::new(Terms::StartDate).date().not_null())
                    .col(ColumnDef::new(Terms::EndDate).date().not_null())
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::CourseId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Credits).integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create sections table
        manager
            .create_table(
                Table::create()
                    .table(Sections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sections::SectionNo)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sections::SecId).integer().not_null())
                    .col(ColumnDef::new(Sections::Building).string().not_null())
                    .col(ColumnDef::new(Sections::Room).string().not_null())
                    .col(ColumnDef::new(Sections::Times).string().not_null())
                    .col(ColumnDef::new(Sections::CourseId).string().not_null())
                    .col(ColumnDef::new(Sections::TermId).integer().not_null())
                    .col(ColumnDef::new(Sections::InstructorEmail).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sections-course_id")
                            .from(Sections::Table, Sections::CourseId)
                            .to(Courses::Table, Courses::CourseId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sections-term_id")
                            .from(Sections::Table, Sections::TermId)
                            .to(Terms::Table, Terms::TermId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrollments table
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::EnrollmentId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::Grade).string())
                    .col(ColumnDef::new(Enrollments::UserId).integer().not_null())
                    .col(ColumnDef::new(Enrollments::SectionNo).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-user_id")
                            .from(Enrollments::Table, Enrollments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-section_no")
                            .from(Enrollments::Table, Enrollments::SectionNo)
                            .to(Sections::Table, Sections::SectionNo)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create assignments table
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::AssignmentId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::DueDate).date().not_null())
                    .col(ColumnDef::new(Assignments::SectionNo).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assignments-section_no")
                            .from(Assignments::Table, Assignments::SectionNo)
                            .to(Sections::Table, Sections::SectionNo)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-assignments-section_no")
                    .table(Assignments::Table)
                    .col(Assignments::SectionNo)
                    .to_owned(),
            )
            .await?;

        // Create grades table
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::GradeId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Grades::EnrollmentId).integer().not_null())
                    .col(ColumnDef::new(Grades::AssignmentId).integer().not_null())
                    .col(ColumnDef::new(Grades::Score).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-enrollment_id")
                            .from(Grades::Table, Grades::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::EnrollmentId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-assignment_id")
                            .from(Grades::Table, Grades::AssignmentId)
                            .to(Assignments::Table, Assignments::AssignmentId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One grade row per (enrollment, assignment). Concurrent lazy
        // materialization relies on this constraint.
        manager
            .create_index(
                Index::create()
                    .name("idx-grades-enrollment_id-assignment_id")
                    .table(Grades::Table)
                    .col(Grades::EnrollmentId)
                    .col(Grades::AssignmentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sections::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Terms::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Terms {
    Table,
    TermId,
    Year,
    Semester,
    StartDate,
    EndDate,
}

#[derive(Iden)]
enum Courses {
    Table,
    CourseId,
    Title,
    Credits,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
}

#[derive(Iden)]
enum Sections {
    Table,
    SectionNo,
    SecId,
    Building,
    Room,
    Times,
    CourseId,
    TermId,
    InstructorEmail,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    EnrollmentId,
    Grade,
    UserId,
    SectionNo,
}

#[derive(Iden)]
enum Assignments {
    Table,
    AssignmentId,
    Title,
    DueDate,
    SectionNo,
}

#[derive(Iden)]
enum Grades {
    Table,
    GradeId,
    EnrollmentId,
    AssignmentId,
    Score,
}
